//! Error types for event handling.
//!
//! Errors carry context that chains through layers:
//! Event → Resolution/Color → Host call

use thiserror::Error;

use crate::color::ColorError;
use crate::config::ConfigError;
use crate::host::HostError;
use crate::resolver::ResolveError;

/// Top-level error surfaced to the host.
#[derive(Error, Debug)]
pub enum AutoloadError {
    /// The event payload couldn't be parsed.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The config file couldn't be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured pattern or regex is invalid.
    #[error("Configuration error: {0}")]
    Resolve(#[from] ResolveError),

    /// Color settings were invalid or couldn't be applied.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// A host call failed while resolving a group.
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Error in an event payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Contents weren't `"<group>;;<action>"`.
    #[error("Malformed {event} event contents: '{contents}'")]
    Malformed { event: String, contents: String },
}

impl EventError {
    /// Create a malformed event error.
    pub fn malformed(event: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::Malformed {
            event: event.into(),
            contents: contents.into(),
        }
    }
}

/// Result type for orchestrator operations.
pub type AutoloadResult<T> = Result<T, AutoloadError>;
