//! Logging infrastructure for the auto loader.
//!
//! All components log through the `tracing` macros. The host process calls
//! [`init_tracing`] once; the returned [`LogHandle`] lets the debug menu
//! toggle switch levels at runtime.

mod types;

pub use types::LogLevel;

use std::fmt as std_fmt;

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Handle for changing the active log level after initialization.
#[derive(Clone)]
pub struct LogHandle {
    inner: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// A handle that ignores level changes.
    ///
    /// Used when the embedding host installs its own subscriber.
    pub fn detached() -> Self {
        Self { inner: None }
    }

    /// Switch the global filter to `level`.
    pub fn set_level(&self, level: LogLevel) {
        let Some(handle) = &self.inner else {
            return;
        };
        if let Err(e) = handle.reload(EnvFilter::new(level.as_filter_str())) {
            tracing::warn!("Failed to change log level: {}", e);
        }
    }
}

impl std_fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.debug_struct("LogHandle")
            .field("attached", &self.inner.is_some())
            .finish()
    }
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with targets
///
/// Should be called once at startup. If a global subscriber is already
/// installed, the existing one is kept and a detached handle is returned.
pub fn init_tracing(default_level: LogLevel) -> LogHandle {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init();

    match installed {
        Ok(()) => LogHandle {
            inner: Some(handle),
        },
        Err(_) => LogHandle::detached(),
    }
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Info.as_filter_str(), "info");
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn debug_toggle_maps_to_levels() {
        assert_eq!(LogLevel::for_debug(true), LogLevel::Debug);
        assert_eq!(LogLevel::for_debug(false), LogLevel::Info);
    }

    #[test]
    fn detached_handle_ignores_changes() {
        LogHandle::detached().set_level(LogLevel::Trace);
    }
}
