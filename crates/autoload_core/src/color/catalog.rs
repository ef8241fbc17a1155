//! Colorspace catalog backed by an OCIO config file.
//!
//! Only the parts of the config needed to validate names are read: each
//! colorspace's `name` and `aliases`, and the `roles` table. The scan is
//! line based and ignores everything else in the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{ColorError, ColorResult};

/// Environment variable pointing at the active OCIO config.
pub const OCIO_ENV_VAR: &str = "OCIO";

/// Config shipped with the package, relative to its support directory.
pub const BUNDLED_CONFIG: &str = "ocio/studio-config-v2.1.0_aces-v1.3_ocio-v2.2.ocio";

/// Lookup of canonical colorspace names.
pub trait ColorCatalog {
    /// Canonical name for `name`, or `None` if the catalog doesn't know it.
    fn canonical_colorspace(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColorspaceEntry {
    name: String,
    aliases: Vec<String>,
}

/// Colorspaces and roles read from an OCIO config.
#[derive(Debug, Clone, Default)]
pub struct OcioCatalog {
    path: Option<PathBuf>,
    colorspaces: Vec<ColorspaceEntry>,
    roles: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Roles,
    Colorspaces,
    Other,
}

impl OcioCatalog {
    /// Find the active config.
    ///
    /// Uses `$OCIO` when set. Otherwise falls back to the bundled config
    /// under `support_dir` and exports `$OCIO` so the host picks up the
    /// same file.
    pub fn locate(support_dir: &Path) -> ColorResult<Self> {
        if let Some(path) = env::var_os(OCIO_ENV_VAR).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(path);
            tracing::debug!("Using OCIO config from ${}: {}", OCIO_ENV_VAR, path.display());
            return Self::from_file(&path);
        }

        let bundled = support_dir.join(BUNDLED_CONFIG);
        if !bundled.exists() {
            return Err(ColorError::CatalogNotFound(bundled));
        }
        tracing::debug!("Setting ${} to bundled config {}", OCIO_ENV_VAR, bundled.display());
        env::set_var(OCIO_ENV_VAR, &bundled);
        Self::from_file(&bundled)
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> ColorResult<Self> {
        if !path.exists() {
            return Err(ColorError::CatalogNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ColorError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut catalog = Self::parse(&content);
        catalog.path = Some(path.to_path_buf());
        tracing::debug!(
            "Loaded {} colorspaces and {} roles from {}",
            catalog.colorspaces.len(),
            catalog.roles.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse config text.
    pub fn parse(content: &str) -> Self {
        let mut catalog = Self::default();
        let mut section = Section::Other;
        let mut current: Option<ColorspaceEntry> = None;
        let mut item_indent: Option<usize> = None;

        for raw in content.lines() {
            let line = strip_comment(raw);
            if line.trim().is_empty() {
                continue;
            }

            if !line.starts_with([' ', '\t', '-']) {
                catalog.push_entry(current.take());
                item_indent = None;
                let key = line.split(':').next().unwrap_or_default().trim();
                section = match key {
                    "roles" => Section::Roles,
                    "colorspaces" | "display_colorspaces" => Section::Colorspaces,
                    _ => Section::Other,
                };
                continue;
            }

            match section {
                Section::Roles => {
                    if let Some((role, colorspace)) = line.trim().split_once(':') {
                        let colorspace = unquote(colorspace);
                        if !colorspace.is_empty() {
                            catalog.roles.push((unquote(role), colorspace));
                        }
                    }
                }
                Section::Colorspaces => {
                    let indent = line.len() - line.trim_start().len();
                    let mut item = line.trim();
                    if let Some(rest) = item.strip_prefix('-') {
                        // Nested transform lists are not colorspace entries.
                        if item_indent.is_some_and(|i| i != indent) {
                            continue;
                        }
                        item_indent = Some(indent);
                        catalog.push_entry(current.take());
                        current = Some(ColorspaceEntry {
                            name: String::new(),
                            aliases: Vec::new(),
                        });
                        item = rest.trim();
                        if item.starts_with("!<") {
                            continue;
                        }
                    }
                    let Some(entry) = current.as_mut() else {
                        continue;
                    };
                    if let Some(value) = item.strip_prefix("name:") {
                        if entry.name.is_empty() {
                            entry.name = unquote(value);
                        }
                    } else if let Some(value) = item.strip_prefix("aliases:") {
                        entry.aliases = parse_list(value);
                    }
                }
                Section::Other => {}
            }
        }
        catalog.push_entry(current.take());
        catalog
    }

    /// Path of the file this catalog was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Names of every colorspace, in file order.
    pub fn colorspace_names(&self) -> impl Iterator<Item = &str> {
        self.colorspaces.iter().map(|c| c.name.as_str())
    }

    fn push_entry(&mut self, entry: Option<ColorspaceEntry>) {
        if let Some(entry) = entry.filter(|e| !e.name.is_empty()) {
            self.colorspaces.push(entry);
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.colorspaces
            .iter()
            .find(|c| {
                c.name.eq_ignore_ascii_case(name)
                    || c.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .map(|c| c.name.as_str())
    }

    /// Colorspace name whose match ends right-most in `text`, longest
    /// name first on ties.
    fn parse_from_string(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.colorspaces
            .iter()
            .filter_map(|c| {
                let needle = c.name.to_lowercase();
                haystack
                    .rfind(&needle)
                    .map(|pos| (pos + needle.len(), needle.len(), c.name.as_str()))
            })
            .max_by_key(|(end, len, _)| (*end, *len))
            .map(|(_, _, name)| name)
    }
}

impl ColorCatalog for OcioCatalog {
    fn canonical_colorspace(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(found) = self.lookup(name) {
            return Some(found.to_string());
        }
        if let Some((_, target)) = self
            .roles
            .iter()
            .find(|(role, _)| role.eq_ignore_ascii_case(name))
        {
            return self.lookup(target).map(str::to_string);
        }
        self.parse_from_string(name).map(str::to_string)
    }
}

/// Drop a trailing `#` comment, keeping `#` inside quoted values.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (pos, c) in line.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, '#') => return &line[..pos],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(unquote)
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) const SAMPLE_CONFIG: &str = r#"ocio_profile_version: 2.1
name: studio-config-v2.1.0_aces-v1.3_ocio-v2.2

roles:
  aces_interchange: ACES2065-1
  color_timing: ACEScct
  scene_linear: ACEScg

displays:
  sRGB - Display:
    - !<View> {name: ACES 1.0 - SDR Video, view_transform: ACES 1.0 - SDR Video}

colorspaces:
  - !<ColorSpace>
    name: ACES2065-1
    aliases: [aces2065_1, ACES - ACES2065-1, lin_ap0]
    family: ACES
    description: The "Academy Color Encoding System" reference color space

  - !<ColorSpace>
    name: ACEScc
    aliases: [ACES - ACEScc, acescc_ap1]
    to_scene_reference: !<BuiltinTransform> {style: ACEScc_to_ACES2065-1}

  - !<ColorSpace>
    name: ACEScct
    to_scene_reference: !<GroupTransform>
      children:
        - !<BuiltinTransform> {style: ACEScct_to_ACES2065-1}
    aliases: [ACES - ACEScct, acescct_ap1]

  - !<ColorSpace>
    name: ACEScg
    aliases: [ACES - ACEScg, lin_ap1]

  - !<ColorSpace>
    name: "Linear Rec.709 (sRGB)"
    aliases: [lin_rec709_srgb, lin_srgb]

display_colorspaces:
  - !<ColorSpace>
    name: sRGB - Display
    aliases: [srgb_display]
"#;

    fn sample() -> OcioCatalog {
        OcioCatalog::parse(SAMPLE_CONFIG)
    }

    #[test]
    fn parses_colorspaces_and_roles() {
        let catalog = sample();
        let names: Vec<&str> = catalog.colorspace_names().collect();
        assert_eq!(
            names,
            vec![
                "ACES2065-1",
                "ACEScc",
                "ACEScct",
                "ACEScg",
                "Linear Rec.709 (sRGB)",
                "sRGB - Display"
            ]
        );
        assert_eq!(catalog.roles.len(), 3);
    }

    #[test]
    fn canonicalizes_names_and_aliases() {
        let catalog = sample();
        assert_eq!(catalog.canonical_colorspace("acescc").as_deref(), Some("ACEScc"));
        assert_eq!(catalog.canonical_colorspace("lin_ap0").as_deref(), Some("ACES2065-1"));
        assert_eq!(catalog.canonical_colorspace("acescct_ap1").as_deref(), Some("ACEScct"));
        assert_eq!(
            catalog.canonical_colorspace("LIN_SRGB").as_deref(),
            Some("Linear Rec.709 (sRGB)")
        );
    }

    #[test]
    fn resolves_roles() {
        let catalog = sample();
        assert_eq!(catalog.canonical_colorspace("scene_linear").as_deref(), Some("ACEScg"));
        assert_eq!(catalog.canonical_colorspace("color_timing").as_deref(), Some("ACEScct"));
    }

    #[test]
    fn finds_longest_rightmost_name_in_text() {
        let catalog = sample();
        assert_eq!(
            catalog.canonical_colorspace("plate_acescct_v001").as_deref(),
            Some("ACEScct")
        );
        assert_eq!(
            catalog.canonical_colorspace("aces2065-1 to acescg").as_deref(),
            Some("ACEScg")
        );
    }

    #[test]
    fn suffix_name_prefers_longer_match_ending_last() {
        let catalog = OcioCatalog::parse(
            r#"colorspaces:
  - !<ColorSpace>
    name: Rec.709
  - !<ColorSpace>
    name: Gamma 2.4 Rec.709
"#,
        );
        assert_eq!(
            catalog.canonical_colorspace("my gamma 2.4 rec.709").as_deref(),
            Some("Gamma 2.4 Rec.709")
        );
        assert_eq!(
            catalog.canonical_colorspace("rec.709 display").as_deref(),
            Some("Rec.709")
        );
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let catalog = OcioCatalog::parse(
            r#"colorspaces:
  - !<ColorSpace>
    name: "Look #2"  # graded
    aliases: ['look#2']
"#,
        );
        let names: Vec<&str> = catalog.colorspace_names().collect();
        assert_eq!(names, vec!["Look #2"]);
        assert_eq!(catalog.canonical_colorspace("LOOK#2").as_deref(), Some("Look #2"));
        assert_eq!(strip_comment("  name: ACEScg # scene linear"), "  name: ACEScg ");
    }

    #[test]
    fn unknown_name_is_none() {
        let catalog = sample();
        assert_eq!(catalog.canonical_colorspace("NoSuchSpace"), None);
        assert_eq!(catalog.canonical_colorspace("  "), None);
    }

    #[test]
    fn from_file_reports_missing_config() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.ocio");
        assert!(matches!(
            OcioCatalog::from_file(&missing),
            Err(ColorError::CatalogNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn from_file_reads_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.ocio");
        fs::write(&path, SAMPLE_CONFIG).unwrap();

        let catalog = OcioCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.path(), Some(path.as_path()));
        assert_eq!(catalog.canonical_colorspace("ACEScc").as_deref(), Some("ACEScc"));
    }
}
