//! Color pipeline configuration for loaded sources.
//!
//! - [`OcioCatalog`] validates colorspace names at startup
//! - [`ColorConfigurator`] sets up linearization and look stages per source
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use autoload_core::color::{OcioCatalog, ResolvedColorSettings};
//! use autoload_core::config::ColorSettings;
//!
//! let catalog = OcioCatalog::from_file(Path::new("/studio/config.ocio")).unwrap();
//! let settings = ResolvedColorSettings::validate(&ColorSettings::default(), &catalog).unwrap();
//! assert_eq!(settings.working_space, "ACEScc");
//! ```

mod catalog;
mod configurator;
mod errors;
mod types;

pub use catalog::{ColorCatalog, OcioCatalog, BUNDLED_CONFIG, OCIO_ENV_VAR};
pub use configurator::ColorConfigurator;
pub use errors::{ColorError, ColorResult};
pub use types::{
    ColorOutcome, FileKind, LinearizeFlags, MovieColorspace, ResolvedColorSettings, StageOutcome,
};

#[cfg(test)]
mod tests {
    use super::catalog::tests::SAMPLE_CONFIG;
    use super::*;
    use crate::config::ColorSettings;

    #[test]
    fn validate_canonicalizes_default_settings() {
        let catalog = OcioCatalog::parse(SAMPLE_CONFIG);
        let settings = ColorSettings {
            exr_colorspace: "lin_ap0".to_string(),
            working_space: "acescc".to_string(),
            ..ColorSettings::default()
        };

        let resolved = ResolvedColorSettings::validate(&settings, &catalog).unwrap();
        assert_eq!(resolved.input_colorspace, "ACES2065-1");
        assert_eq!(resolved.working_space, "ACEScc");
        assert_eq!(resolved.movie_colorspace, "Rec709");
    }

    #[test]
    fn validate_rejects_unknown_colorspace() {
        let catalog = OcioCatalog::parse(SAMPLE_CONFIG);
        let settings = ColorSettings {
            working_space: "NoSuchSpace".to_string(),
            ..ColorSettings::default()
        };

        let err = ResolvedColorSettings::validate(&settings, &catalog).unwrap_err();
        assert!(matches!(err, ColorError::UnknownColorspace(ref name) if name == "NoSuchSpace"));
        assert_eq!(
            err.to_string(),
            "Configuration error: Could not find color space: NoSuchSpace"
        );
    }
}
