//! Color settings and outcome types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::catalog::ColorCatalog;
use super::errors::{ColorError, ColorResult};
use crate::config::ColorSettings;

/// Encoding tag for movie files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieColorspace {
    Srgb,
    Rec709,
    Linear,
}

impl FromStr for MovieColorspace {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sRGB" => Ok(MovieColorspace::Srgb),
            "Rec709" => Ok(MovieColorspace::Rec709),
            "Linear" => Ok(MovieColorspace::Linear),
            other => Err(ColorError::UnknownMovieColorspace(other.to_string())),
        }
    }
}

impl fmt::Display for MovieColorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieColorspace::Srgb => write!(f, "sRGB"),
            MovieColorspace::Rec709 => write!(f, "Rec709"),
            MovieColorspace::Linear => write!(f, "Linear"),
        }
    }
}

/// Values for the linearize node's three conversion flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearizeFlags {
    pub srgb: i32,
    pub log: i32,
    pub rec709: i32,
}

impl MovieColorspace {
    /// Flags that linearize this encoding. At most one is set.
    pub fn linearize_flags(&self) -> LinearizeFlags {
        match self {
            MovieColorspace::Srgb => LinearizeFlags {
                srgb: 1,
                log: 0,
                rec709: 0,
            },
            MovieColorspace::Rec709 => LinearizeFlags {
                srgb: 0,
                log: 0,
                rec709: 1,
            },
            MovieColorspace::Linear => LinearizeFlags {
                srgb: 0,
                log: 0,
                rec709: 0,
            },
        }
    }
}

/// How a source file is color managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Movie container, linearized by flag.
    Movie,
    /// Log/scene-linear still frames, linearized through OCIO.
    Still,
    /// Anything else; left alone.
    Other,
}

const MOVIE_EXTENSIONS: &[&str] = &["mov", "mp4", "m4v", "mxf", "avi", "mkv", "webm"];
const STILL_EXTENSIONS: &[&str] = &["exr", "dpx", "cin"];

impl FileKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return FileKind::Other;
        };
        let ext = ext.to_ascii_lowercase();
        if MOVIE_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Movie
        } else if STILL_EXTENSIONS.contains(&ext.as_str()) {
            FileKind::Still
        } else {
            FileKind::Other
        }
    }
}

/// Color settings with colorspace names validated against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColorSettings {
    /// Movie colorspace tag as configured; parsed when a movie is configured.
    pub movie_colorspace: String,
    /// Canonical input colorspace for stills.
    pub input_colorspace: String,
    /// Canonical working colorspace.
    pub working_space: String,
    /// Look CDL pattern.
    pub look_cdl: Option<String>,
    /// Look LUT pattern.
    pub look_lut: Option<String>,
}

impl ResolvedColorSettings {
    /// Validate configured colorspace names, replacing them with their
    /// canonical catalog names.
    pub fn validate(settings: &ColorSettings, catalog: &dyn ColorCatalog) -> ColorResult<Self> {
        let canonical = |name: &str| {
            catalog
                .canonical_colorspace(name)
                .ok_or_else(|| ColorError::UnknownColorspace(name.to_string()))
        };

        let working_space = canonical(&settings.working_space)?;
        let input_colorspace = canonical(&settings.exr_colorspace)?;
        tracing::debug!(
            "Validated colorspaces: input '{}', working '{}'",
            input_colorspace,
            working_space
        );

        Ok(Self {
            movie_colorspace: settings.mov_colorspace.clone(),
            input_colorspace,
            working_space,
            look_cdl: settings.look_cdl.clone(),
            look_lut: settings.look_lut.clone(),
        })
    }
}

/// Result of one look stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// No pattern configured for this stage.
    NotConfigured,
    /// The file was found and loaded into its node.
    Loaded(PathBuf),
    /// The pattern didn't resolve to a file.
    NotFound,
    /// The host failed to load the file.
    Failed(String),
}

/// Summary of the color configuration of one source group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOutcome {
    pub kind: FileKind,
    pub look_cdl: StageOutcome,
    pub look_lut: StageOutcome,
}

impl ColorOutcome {
    pub(crate) fn untouched(kind: FileKind) -> Self {
        Self {
            kind,
            look_cdl: StageOutcome::NotConfigured,
            look_lut: StageOutcome::NotConfigured,
        }
    }
}
