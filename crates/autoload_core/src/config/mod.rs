//! Configuration for the auto loader.
//!
//! This module provides:
//! - TOML-based configuration with `[main]`, `[plates]`, `[other]` and `[color]` sections
//! - Default-file creation when the user has no config yet
//! - Fallback to defaults when the file can't be read
//! - Atomic file writes (write to temp, then rename)
//!
//! # Example
//!
//! ```no_run
//! use autoload_core::config::ConfigManager;
//!
//! let mut manager = ConfigManager::at_default_location().unwrap();
//! manager.load_or_create().unwrap();
//!
//! println!("Version regex: {}", manager.config().main.version_regex);
//! ```

mod manager;
mod settings;

pub use manager::{default_config_path, ConfigError, ConfigManager, ConfigResult, CONFIG_FILE_NAME};
pub use settings::{
    AutoloaderConfig, ColorSettings, ConfigSection, MainSettings, PlateSettings, PlateVariant,
    PLATE_PREFIX,
};
