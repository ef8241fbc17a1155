//! Config manager for loading, creating and importing the autoloader config.
//!
//! Key behaviors:
//! - A missing file is created with commented defaults
//! - An unreadable or invalid file falls back to defaults with a warning
//! - Unknown sections are reported but left untouched
//! - Writes are atomic (write to temp file, then rename)

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::DocumentMut;

use super::settings::{AutoloaderConfig, ConfigSection};

/// File name of the user config, placed in the home directory.
pub const CONFIG_FILE_NAME: &str = ".slingshot_rv_autoloader.toml";

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Could not determine the home directory")]
    NoHomeDir,
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Path of the user config file in the home directory.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Manages the autoloader configuration file.
pub struct ConfigManager {
    /// Path to the config file.
    config_path: PathBuf,
    /// Current configuration loaded in memory.
    config: AutoloaderConfig,
}

impl ConfigManager {
    /// Create a new config manager with the given config file path.
    ///
    /// Does not load the config - call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            config: AutoloaderConfig::default(),
        }
    }

    /// Create a manager for the config file in the user's home directory.
    pub fn at_default_location() -> ConfigResult<Self> {
        Ok(Self::new(default_config_path()?))
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &AutoloaderConfig {
        &self.config
    }

    /// Consume the manager, returning the loaded configuration.
    pub fn into_config(self) -> AutoloaderConfig {
        self.config
    }

    /// Load config from file.
    ///
    /// Returns error if the file doesn't exist or can't be parsed.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.config = parse_and_validate(&content)?;
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    ///
    /// A file that exists but can't be read or parsed is not fatal: the
    /// default configuration is used instead.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at path: {}, default settings will be used",
                self.config_path.display()
            );
            self.config = AutoloaderConfig::default();
            self.save()?;
            return Ok(());
        }

        match self.load() {
            Ok(()) => {
                tracing::debug!("Loaded config from {}", self.config_path.display());
            }
            Err(e) => {
                tracing::warn!("Error reading config file: {}", e);
                self.config = AutoloaderConfig::default();
            }
        }
        Ok(())
    }

    /// Replace the user's config with the contents of another file.
    ///
    /// The source is parsed first so a broken file never overwrites a
    /// working config.
    pub fn import_from(&mut self, source: &Path) -> ConfigResult<()> {
        let content = fs::read_to_string(source)?;
        let config = parse_and_validate(&content)?;

        tracing::debug!(
            "Copying config file {} to {}",
            source.display(),
            self.config_path.display()
        );
        self.atomic_write(&content)?;
        self.config = config;
        Ok(())
    }

    /// Save the current configuration atomically, with comments.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Generate config content with helpful comments.
    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let config = &self.config;
        let mut output = String::new();

        output.push_str("# RV Auto Loader Configuration\n");
        output.push_str(
            "# Patterns are globs relative to the loaded media's folder, or absolute paths.\n",
        );
        output.push_str(
            "# Named groups captured by version_regex can be used as ${name} placeholders.\n\n",
        );

        output.push_str("# Filename parsing\n");
        output.push_str("[main]\n");
        push_lines(&mut output, &toml::to_string_pretty(&config.main)?);
        output.push('\n');

        output.push_str("# Plate and v000 media representations\n");
        output.push_str("[plates]\n");
        let plates = toml::to_string_pretty(&config.plates)?;
        if plates.trim().is_empty() {
            output.push_str("# plate_mov_path = \"../plates/*.mov\"\n");
            output.push_str("# plate_frames_path = \"../plates/*.1001.exr\"\n");
            output.push_str("# v000_mov_path = \"*_v000.mov\"\n");
            output.push_str("# v000_frames_path = \"*_v000.1001.exr\"\n");
            output.push_str("# plate_cut_in_frame = 1001\n");
            output.push_str("# plate_first_frame_in_file = 993\n");
        } else {
            push_lines(&mut output, &plates);
        }
        output.push('\n');

        output.push_str("# Additional media representations (name = pattern)\n");
        output.push_str("[other]\n");
        let other = toml::to_string_pretty(&config.other)?;
        if other.trim().is_empty() {
            output.push_str("# Denoise = \"*_${version}_dn.mov\"\n");
        } else {
            push_lines(&mut output, &other);
        }
        output.push('\n');

        output.push_str("# Color management\n");
        output.push_str("# mov_colorspace is one of: sRGB, Rec709, Linear\n");
        output.push_str("[color]\n");
        push_lines(&mut output, &toml::to_string_pretty(&config.color)?);
        if config.color.look_cdl.is_none() {
            output.push_str("# look_cdl = \"*.cdl\"\n");
        }
        if config.color.look_lut.is_none() {
            output.push_str("# look_lut = \"*.cube\"\n");
        }

        Ok(output)
    }

    /// Write content to config file atomically.
    ///
    /// Writes to a temp file first, then renames.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Same directory so the rename stays on one filesystem
        let temp_path = self.config_path.with_extension("toml.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

/// Parse config content, warn about unknown sections and normalize blanks.
fn parse_and_validate(content: &str) -> ConfigResult<AutoloaderConfig> {
    let doc: DocumentMut = content.parse()?;
    let valid_sections: Vec<&str> = ConfigSection::ALL.iter().map(|s| s.table_name()).collect();

    for (key, _) in doc.iter() {
        if !valid_sections.contains(&key) {
            tracing::warn!("Ignoring unknown config section: [{}]", key);
        }
    }

    let config: AutoloaderConfig = toml::from_str(content)?;
    Ok(config.normalized())
}

fn push_lines(output: &mut String, content: &str) {
    for line in content.lines() {
        output.push_str(line);
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        for section in ["[main]", "[plates]", "[other]", "[color]"] {
            assert!(content.contains(section), "missing {section}");
        }
        assert_eq!(manager.config(), &AutoloaderConfig::default());
    }

    #[test]
    fn default_file_reads_back_as_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        ConfigManager::new(&config_path).load_or_create().unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load().unwrap();
        assert_eq!(manager.into_config(), AutoloaderConfig::default());
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "[plates]\nplate_mov_path = \"../plates/*.mov\"\nplate_cut_in_frame = 1001\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(
            manager.config().plates.plate_mov_path.as_deref(),
            Some("../plates/*.mov")
        );
        assert_eq!(manager.config().plates.plate_cut_in_frame, Some(1001));
        // File is left as written
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("[color]"));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[plates\nthis is not toml").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.config(), &AutoloaderConfig::default());
    }

    #[test]
    fn load_requires_file() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("missing.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "[legacy]\nenabled = true\n\n[color]\nmov_colorspace = \"sRGB\"\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load().unwrap();
        assert_eq!(manager.config().color.mov_colorspace, "sRGB");
    }

    #[test]
    fn import_copies_source_over_user_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        let source = dir.path().join("studio.toml");
        fs::write(&source, "[other]\nDenoise = \"*_dn.mov\"\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        manager.import_from(&source).unwrap();

        assert_eq!(manager.config().other["Denoise"], "*_dn.mov");
        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            fs::read_to_string(&source).unwrap()
        );
        assert!(!config_path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn import_rejects_invalid_source() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        let source = dir.path().join("broken.toml");
        fs::write(&source, "[color\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        let before = fs::read_to_string(&config_path).unwrap();

        assert!(manager.import_from(&source).is_err());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), before);
    }
}
