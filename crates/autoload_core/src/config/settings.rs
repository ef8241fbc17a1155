//! Autoloader settings with TOML-based sections.
//!
//! Settings are organized into the `[main]`, `[plates]`, `[other]` and
//! `[color]` tables of the user's config file. Every field carries a default
//! so partially written files still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix shared by the plate representation names.
///
/// Representations whose name starts with this prefix receive the plate
/// cut-in and range-start properties when they are applied.
pub const PLATE_PREFIX: &str = "Plate";

/// Root configuration snapshot, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoloaderConfig {
    /// Filename parsing settings.
    #[serde(default)]
    pub main: MainSettings,

    /// Plate and v000 path patterns.
    #[serde(default)]
    pub plates: PlateSettings,

    /// Additional user-named variant patterns (name -> pattern).
    #[serde(default)]
    pub other: BTreeMap<String, String>,

    /// Color pipeline settings.
    #[serde(default)]
    pub color: ColorSettings,
}

impl AutoloaderConfig {
    /// Treat blank values as absent.
    ///
    /// Empty optional patterns become `None`, empty `[other]` entries are
    /// dropped and blank required strings fall back to their defaults.
    pub fn normalized(mut self) -> Self {
        if self.main.version_regex.trim().is_empty() {
            self.main.version_regex = default_version_regex();
        }

        for pattern in [
            &mut self.plates.plate_mov_path,
            &mut self.plates.plate_frames_path,
            &mut self.plates.v000_mov_path,
            &mut self.plates.v000_frames_path,
            &mut self.color.look_cdl,
            &mut self.color.look_lut,
        ] {
            if pattern.as_deref().is_some_and(|p| p.trim().is_empty()) {
                *pattern = None;
            }
        }

        self.other.retain(|name, pattern| {
            !name.trim().is_empty() && !pattern.trim().is_empty()
        });

        if self.color.mov_colorspace.trim().is_empty() {
            self.color.mov_colorspace = default_mov_colorspace();
        }
        if self.color.exr_colorspace.trim().is_empty() {
            self.color.exr_colorspace = default_exr_colorspace();
        }
        if self.color.working_space.trim().is_empty() {
            self.color.working_space = default_working_space();
        }

        self
    }
}

/// `[main]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainSettings {
    /// Regex applied to the primary filename. Named groups become template
    /// placeholders (e.g. `${version}`).
    #[serde(default = "default_version_regex")]
    pub version_regex: String,
}

fn default_version_regex() -> String {
    r"_(?P<version>v\d+)".to_string()
}

impl Default for MainSettings {
    fn default() -> Self {
        Self {
            version_regex: default_version_regex(),
        }
    }
}

/// `[plates]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateSettings {
    /// Pattern for the plate movie.
    #[serde(default)]
    pub plate_mov_path: Option<String>,

    /// Pattern for the plate frame sequence.
    #[serde(default)]
    pub plate_frames_path: Option<String>,

    /// Pattern for the v000 movie.
    #[serde(default)]
    pub v000_mov_path: Option<String>,

    /// Pattern for the v000 frame sequence.
    #[serde(default)]
    pub v000_frames_path: Option<String>,

    /// Frame the plate cuts in on.
    #[serde(default)]
    pub plate_cut_in_frame: Option<i32>,

    /// Number of the first frame stored in the plate file.
    #[serde(default)]
    pub plate_first_frame_in_file: Option<i32>,
}

impl PlateSettings {
    /// Get the configured pattern for a plate variant.
    pub fn pattern(&self, variant: PlateVariant) -> Option<&str> {
        match variant {
            PlateVariant::PlateMov => self.plate_mov_path.as_deref(),
            PlateVariant::PlateFrames => self.plate_frames_path.as_deref(),
            PlateVariant::V000Mov => self.v000_mov_path.as_deref(),
            PlateVariant::V000Frames => self.v000_frames_path.as_deref(),
        }
    }
}

/// The fixed set of priority variants configured in `[plates]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateVariant {
    PlateMov,
    PlateFrames,
    V000Mov,
    V000Frames,
}

impl PlateVariant {
    /// All variants, in the order they are queued.
    pub const ALL: [PlateVariant; 4] = [
        PlateVariant::PlateMov,
        PlateVariant::PlateFrames,
        PlateVariant::V000Mov,
        PlateVariant::V000Frames,
    ];

    /// Media representation name created for this variant.
    pub fn representation_name(&self) -> &'static str {
        match self {
            PlateVariant::PlateMov => "Plate",
            PlateVariant::PlateFrames => "Plate Frames",
            PlateVariant::V000Mov => "v000",
            PlateVariant::V000Frames => "v000 Frames",
        }
    }

    /// Key of this variant in the `[plates]` table.
    pub fn config_key(&self) -> &'static str {
        match self {
            PlateVariant::PlateMov => "plate_mov_path",
            PlateVariant::PlateFrames => "plate_frames_path",
            PlateVariant::V000Mov => "v000_mov_path",
            PlateVariant::V000Frames => "v000_frames_path",
        }
    }
}

/// `[color]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSettings {
    /// Encoding of movie files: `sRGB`, `Rec709` or `Linear`.
    ///
    /// Kept as written; the color configurator rejects unknown tags.
    #[serde(default = "default_mov_colorspace")]
    pub mov_colorspace: String,

    /// Input colorspace for EXR/DPX stills.
    #[serde(default = "default_exr_colorspace")]
    pub exr_colorspace: String,

    /// Session working colorspace.
    #[serde(default = "default_working_space")]
    pub working_space: String,

    /// Pattern for the look CDL.
    #[serde(default)]
    pub look_cdl: Option<String>,

    /// Pattern for the look LUT.
    #[serde(default)]
    pub look_lut: Option<String>,
}

fn default_mov_colorspace() -> String {
    "Rec709".to_string()
}

fn default_exr_colorspace() -> String {
    "ACES2065-1".to_string()
}

fn default_working_space() -> String {
    "ACEScc".to_string()
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            mov_colorspace: default_mov_colorspace(),
            exr_colorspace: default_exr_colorspace(),
            working_space: default_working_space(),
            look_cdl: None,
            look_lut: None,
        }
    }
}

/// Names of config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Main,
    Plates,
    Other,
    Color,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Main,
        ConfigSection::Plates,
        ConfigSection::Other,
        ConfigSection::Color,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Main => "main",
            ConfigSection::Plates => "plates",
            ConfigSection::Other => "other",
            ConfigSection::Color => "color",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: AutoloaderConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, AutoloaderConfig::default());
        assert_eq!(parsed.main.version_regex, r"_(?P<version>v\d+)");
        assert_eq!(parsed.color.mov_colorspace, "Rec709");
        assert_eq!(parsed.color.exr_colorspace, "ACES2065-1");
        assert_eq!(parsed.color.working_space, "ACEScc");
    }

    #[test]
    fn all_plate_keys_parse() {
        let content = r#"
[plates]
plate_mov_path = "/path/to/plate_mov"
plate_frames_path = "/path/to/plate_frames"
v000_mov_path = "/path/to/v000_mov"
v000_frames_path = "/path/to/v000_frames"
plate_first_frame_in_file = 5
plate_cut_in_frame = 1000
"#;
        let parsed: AutoloaderConfig = toml::from_str(content).unwrap();
        assert_eq!(
            parsed.plates,
            PlateSettings {
                plate_mov_path: Some("/path/to/plate_mov".to_string()),
                plate_frames_path: Some("/path/to/plate_frames".to_string()),
                v000_mov_path: Some("/path/to/v000_mov".to_string()),
                v000_frames_path: Some("/path/to/v000_frames".to_string()),
                plate_cut_in_frame: Some(1000),
                plate_first_frame_in_file: Some(5),
            }
        );
    }

    #[test]
    fn some_plate_keys_missing() {
        let parsed: AutoloaderConfig =
            toml::from_str("[plates]\nplate_mov_path = \"/path/to/plate_mov\"\n").unwrap();
        assert_eq!(
            parsed.plates.pattern(PlateVariant::PlateMov),
            Some("/path/to/plate_mov")
        );
        assert_eq!(parsed.plates.pattern(PlateVariant::PlateFrames), None);
        assert_eq!(parsed.plates.plate_first_frame_in_file, None);
    }

    #[test]
    fn normalized_drops_blank_values() {
        let content = r#"
[main]
version_regex = ""

[plates]
plate_mov_path = ""
v000_mov_path = "*_v000.mov"

[other]
denoise = "*_dn.mov"
empty = ""

[color]
working_space = " "
look_lut = ""
"#;
        let parsed: AutoloaderConfig = toml::from_str(content).unwrap();
        let config = parsed.normalized();

        assert_eq!(config.main, MainSettings::default());
        assert_eq!(config.plates.plate_mov_path, None);
        assert_eq!(config.plates.v000_mov_path.as_deref(), Some("*_v000.mov"));
        assert_eq!(config.other.len(), 1);
        assert_eq!(config.other["denoise"], "*_dn.mov");
        assert_eq!(config.color.working_space, "ACEScc");
        assert_eq!(config.color.look_lut, None);
    }

    #[test]
    fn plate_variant_names() {
        let names: Vec<_> = PlateVariant::ALL
            .iter()
            .map(|v| v.representation_name())
            .collect();
        assert_eq!(names, vec!["Plate", "Plate Frames", "v000", "v000 Frames"]);
        assert!(PlateVariant::PlateFrames
            .representation_name()
            .starts_with(PLATE_PREFIX));
        assert!(!PlateVariant::V000Mov
            .representation_name()
            .starts_with(PLATE_PREFIX));
    }
}
