//! Autoload Core - variant media auto loader for a review session
//!
//! When a shot is loaded, this crate finds its plate, v000 and other
//! variant files next to it, queues them as alternate media
//! representations and adds them once the host has finished loading. It
//! also sets up per-source color management.
//!
//! The host application is reached only through the traits in [`host`].

pub mod color;
pub mod config;
pub mod host;
pub mod logging;
pub mod mode;
pub mod orchestrator;
pub mod resolver;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
