//! File pattern resolution.
//!
//! Maps a primary media path plus a configured pattern to a file on disk:
//!
//! 1. The version regex runs (case-insensitively) on the primary file name;
//!    its named groups become placeholder values.
//! 2. Placeholders in the pattern are substituted (`${version}`).
//! 3. Absolute results are used as-is. Relative results are globbed inside
//!    the primary file's folder and the first match, in sorted order, wins.
//! 4. Anything that isn't an existing regular file resolves to `None`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use autoload_core::resolver::FileResolver;
//!
//! let resolver = FileResolver::new(r"_(?P<version>v\d+)").unwrap();
//! let prores = resolver
//!     .resolve(Path::new("/shots/sh010/shot010_v003.mov"), "*_${version}_prores.mov")
//!     .unwrap();
//! ```

mod error;
mod template;

pub use error::{ResolveError, ResolveResult};
pub use template::substitute;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};

/// Resolves configured patterns relative to a primary media file.
#[derive(Debug, Clone)]
pub struct FileResolver {
    version_regex: Regex,
}

impl FileResolver {
    /// Create a resolver using `version_regex` to extract placeholder values.
    pub fn new(version_regex: &str) -> ResolveResult<Self> {
        let version_regex = RegexBuilder::new(version_regex)
            .case_insensitive(true)
            .build()
            .map_err(|source| ResolveError::InvalidRegex {
                pattern: version_regex.to_string(),
                source,
            })?;
        Ok(Self { version_regex })
    }

    /// Named groups captured from the primary file name.
    ///
    /// Empty when the regex doesn't match. Groups that didn't participate
    /// in the match are left out, so their placeholders stay literal.
    pub fn placeholders(&self, primary: &Path) -> HashMap<String, String> {
        let file_name = primary
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let Some(captures) = self.version_regex.captures(&file_name) else {
            return HashMap::new();
        };

        self.version_regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect()
    }

    /// Substitute placeholders from the primary file name into `pattern`.
    pub fn expand(&self, primary: &Path, pattern: &str) -> ResolveResult<String> {
        let values = self.placeholders(primary);
        if values.is_empty() {
            return Ok(pattern.to_string());
        }
        substitute(pattern, &values)
    }

    /// Resolve `pattern` against `primary`.
    ///
    /// Returns `Ok(None)` (with a warning) when nothing matches or the match
    /// isn't a regular file. Errors are reserved for malformed patterns.
    pub fn resolve(&self, primary: &Path, pattern: &str) -> ResolveResult<Option<PathBuf>> {
        let expanded = self.expand(primary, pattern)?;
        tracing::debug!("Resolving pattern '{}' as '{}'", pattern, expanded);

        let candidate = if Path::new(&expanded).is_absolute() {
            PathBuf::from(&expanded)
        } else {
            let base = base_dir(primary);
            match first_glob_match(base, &expanded)? {
                Some(path) => path,
                None => {
                    tracing::warn!("Can't find file: {}", base.join(&expanded).display());
                    return Ok(None);
                }
            }
        };

        if !candidate.is_file() {
            tracing::warn!("Can't load file: {} is not a file", candidate.display());
            return Ok(None);
        }

        Ok(Some(candidate))
    }
}

/// Folder of the primary file; `.` for bare file names.
fn base_dir(primary: &Path) -> &Path {
    match primary.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// First match of `pattern` inside `base`, canonicalized.
///
/// Matches are sorted so ambiguous patterns resolve the same way on every
/// filesystem.
fn first_glob_match(base: &Path, pattern: &str) -> ResolveResult<Option<PathBuf>> {
    let escaped_base = Pattern::escape(&base.to_string_lossy());
    let full_pattern = Path::new(&escaped_base).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob::glob_with(&full_pattern, options).map_err(|source| {
        ResolveError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("Skipping unreadable glob entry: {}", e);
                None
            }
        })
        .collect();
    matches.sort();

    let Some(first) = matches.into_iter().next() else {
        return Ok(None);
    };

    match fs::canonicalize(&first) {
        Ok(path) => Ok(Some(path)),
        Err(e) => {
            tracing::warn!("Can't resolve {}: {}", first.display(), e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DEFAULT_REGEX: &str = r"_(?P<version>v\d+)";

    /// Create `relative` under `root` and return its path.
    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    fn resolve(regex: &str, primary: &Path, pattern: &str) -> Option<PathBuf> {
        FileResolver::new(regex)
            .unwrap()
            .resolve(primary, pattern)
            .unwrap()
    }

    #[test]
    fn resolves_plain_file_name() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "version_1.2.3/file.txt");

        let result = resolve(DEFAULT_REGEX, &primary, "file.txt");
        assert_eq!(result, Some(fs::canonicalize(&primary).unwrap()));
    }

    #[test]
    fn resolves_wildcard() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "version_1.2.3/file.txt");

        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "f*.txt"),
            Some(fs::canonicalize(&primary).unwrap())
        );
        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "*.txt"),
            Some(fs::canonicalize(&primary).unwrap())
        );
    }

    #[test]
    fn substitutes_default_version_group() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "path/file_v001.txt");

        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "*${version}.txt"),
            Some(fs::canonicalize(&primary).unwrap())
        );
    }

    #[test]
    fn substitutes_custom_version_group() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "path/file_version1.2.3.txt");

        let regex = r"version(?P<version>[0-9]+\.[0-9]+\.[0-9]+)";
        assert_eq!(
            resolve(regex, &primary, "*${version}.txt"),
            Some(fs::canonicalize(&primary).unwrap())
        );
    }

    #[test]
    fn no_match_is_not_found() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "version_1.2.3/file.txt");

        assert_eq!(resolve(DEFAULT_REGEX, &primary, "*.mov"), None);
    }

    #[test]
    fn finds_prores_sibling_for_version() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "shot010_v003.mov");
        let pattern = "*_${version}_prores.mov";

        assert_eq!(resolve(DEFAULT_REGEX, &primary, pattern), None);

        let prores = touch(dir.path(), "shot010_v003_prores.mov");
        touch(dir.path(), "shot010_v002_prores.mov");
        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, pattern),
            Some(fs::canonicalize(&prores).unwrap())
        );
    }

    #[test]
    fn version_regex_is_case_insensitive() {
        let resolver = FileResolver::new(DEFAULT_REGEX).unwrap();
        let values = resolver.placeholders(Path::new("/shots/SHOT010_V007.mov"));
        assert_eq!(values.get("version").map(String::as_str), Some("V007"));
    }

    #[test]
    fn regex_applies_to_file_name_only() {
        let resolver = FileResolver::new(DEFAULT_REGEX).unwrap();
        let values = resolver.placeholders(Path::new("/jobs/show_v2/shot010.mov"));
        assert!(values.is_empty());
        assert_eq!(
            resolver
                .expand(Path::new("/jobs/show_v2/shot010.mov"), "*_${version}.mov")
                .unwrap(),
            "*_${version}.mov"
        );
    }

    #[test]
    fn ambiguous_pattern_takes_first_sorted_match() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "shot_v001.mov");
        touch(dir.path(), "plates/c_plate.mov");
        let first = touch(dir.path(), "plates/a_plate.mov");
        touch(dir.path(), "plates/b_plate.mov");

        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "plates/*_plate.mov"),
            Some(fs::canonicalize(&first).unwrap())
        );
    }

    #[test]
    fn relative_parent_pattern_is_canonicalized() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "comp/shot_v001.mov");
        let plate = touch(dir.path(), "plates/shot_plate.mov");

        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "../plates/*.mov"),
            Some(fs::canonicalize(&plate).unwrap())
        );
    }

    #[test]
    fn absolute_pattern_is_used_directly() {
        let dir = tempdir().unwrap();
        let target = touch(dir.path(), "elsewhere/lut.cube");
        let primary = Path::new("/does/not/exist/shot_v001.exr");

        let pattern = target.to_string_lossy().into_owned();
        assert_eq!(resolve(DEFAULT_REGEX, primary, &pattern), Some(target));
    }

    #[test]
    fn directory_match_is_not_a_file() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "shot_v001.mov");
        fs::create_dir_all(dir.path().join("shot_v001_frames")).unwrap();

        assert_eq!(resolve(DEFAULT_REGEX, &primary, "*_frames"), None);
        let absolute = dir.path().join("shot_v001_frames");
        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, &absolute.to_string_lossy()),
            None
        );
    }

    #[test]
    fn base_folder_glob_characters_are_literal() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "[shots]/shot_v001.mov");
        let plate = touch(dir.path(), "[shots]/shot_plate.mov");

        assert_eq!(
            resolve(DEFAULT_REGEX, &primary, "*_plate.mov"),
            Some(fs::canonicalize(&plate).unwrap())
        );
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(matches!(
            FileResolver::new("(?P<version>"),
            Err(ResolveError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let resolver = FileResolver::new(DEFAULT_REGEX).unwrap();
        let result = resolver.resolve(Path::new("/shots/shot_v001.mov"), "*_${version.mov");
        assert!(matches!(result, Err(ResolveError::MalformedPattern { .. })));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let dir = tempdir().unwrap();
        let primary = touch(dir.path(), "shot.mov");

        let resolver = FileResolver::new(DEFAULT_REGEX).unwrap();
        let result = resolver.resolve(&primary, "a***b.mov");
        assert!(matches!(result, Err(ResolveError::InvalidGlob { .. })));
    }
}
