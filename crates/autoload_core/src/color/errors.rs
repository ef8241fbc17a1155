//! Error types for color pipeline setup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::HostError;
use crate::resolver::ResolveError;

/// Error raised while validating or applying color settings.
#[derive(Error, Debug)]
pub enum ColorError {
    /// `mov_colorspace` isn't one of the recognized tags.
    #[error(
        "Configuration error: unknown movie colorspace '{0}' (expected sRGB, Rec709 or Linear)"
    )]
    UnknownMovieColorspace(String),

    /// A colorspace name isn't in the color-management catalog.
    #[error("Configuration error: Could not find color space: {0}")]
    UnknownColorspace(String),

    /// The color-management config file doesn't exist.
    #[error("OCIO config file not found at path: {0}")]
    CatalogNotFound(PathBuf),

    /// The color-management config file couldn't be read.
    #[error("Failed to read OCIO config {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A look pattern is malformed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
