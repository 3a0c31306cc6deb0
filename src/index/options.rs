//! Generator configuration and per-batch scan options.

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::project::path::normalize_separators;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["php", "inc", "hh"];

/// Directory names whose duplicates are not worth reporting.
pub const DEFAULT_AUXILIARY_DIRS: &[&str] = &[
    "test", "tests", "fixture", "fixtures", "example", "examples", "stub", "stubs",
];

// ============================================================================
// GENERATOR CONFIG
// ============================================================================

/// Settings that hold for every batch run by one generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Lower-cased extensions, without the dot.
    pub extensions: Vec<String>,
    /// Directory names that make a duplicate unreportable.
    pub auxiliary_dirs: Vec<String>,
    /// Read and scan files on the rayon pool. Folding stays sequential.
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            auxiliary_dirs: DEFAULT_AUXILIARY_DIRS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            parallel: false,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension set. Leading dots are ignored.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Replace the auxiliary directory names.
    pub fn with_auxiliary_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.auxiliary_dirs = dirs.into_iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Case-insensitive extension match.
    pub fn accepts_extension(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| {
            self.extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }
}

// ============================================================================
// SCAN SOURCE
// ============================================================================

/// What one batch scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanSource {
    /// A directory walked recursively, or a single file.
    Path(String),
    /// Files (paths or URIs) supplied by the caller, scanned as given.
    Files(Vec<String>),
}

impl From<&str> for ScanSource {
    fn from(path: &str) -> Self {
        ScanSource::Path(path.to_string())
    }
}

impl From<String> for ScanSource {
    fn from(path: String) -> Self {
        ScanSource::Path(path)
    }
}

impl From<&Path> for ScanSource {
    fn from(path: &Path) -> Self {
        ScanSource::Path(normalize_separators(&path.to_string_lossy()))
    }
}

impl From<PathBuf> for ScanSource {
    fn from(path: PathBuf) -> Self {
        ScanSource::from(path.as_path())
    }
}

impl From<Vec<String>> for ScanSource {
    fn from(files: Vec<String>) -> Self {
        ScanSource::Files(files)
    }
}

impl From<Vec<PathBuf>> for ScanSource {
    fn from(files: Vec<PathBuf>) -> Self {
        ScanSource::Files(
            files
                .iter()
                .map(|f| normalize_separators(&f.to_string_lossy()))
                .collect(),
        )
    }
}

// ============================================================================
// CONVENTION RULES
// ============================================================================

/// How namespaces map onto directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConventionStyle {
    /// `Prefix\Sub\Name` lives at `base/Sub/Name.ext`.
    Psr4,
    /// `Ns\Sub\Vendor_Name` lives at `base/Ns/Sub/Vendor/Name.ext`.
    Psr0,
}

/// A namespace prefix bound to a base directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConventionRule {
    /// Namespace prefix, either empty or ending in `\`.
    pub prefix: SmolStr,
    pub base_dir: String,
    pub style: ConventionStyle,
}

impl ConventionRule {
    pub fn new(prefix: &str, base_dir: impl Into<String>, style: ConventionStyle) -> Self {
        let prefix = prefix.trim_start_matches('\\');
        let prefix = if prefix.is_empty() || prefix.ends_with('\\') {
            SmolStr::new(prefix)
        } else {
            SmolStr::new(format!("{prefix}\\"))
        };

        Self {
            prefix,
            base_dir: normalize_separators(&base_dir.into()),
            style,
        }
    }

    pub fn psr4(prefix: &str, base_dir: impl Into<String>) -> Self {
        Self::new(prefix, base_dir, ConventionStyle::Psr4)
    }

    pub fn psr0(prefix: &str, base_dir: impl Into<String>) -> Self {
        Self::new(prefix, base_dir, ConventionStyle::Psr0)
    }
}

/// Whether a batch indexes everything or only convention-conforming symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ScanMode {
    #[default]
    Classmap,
    Convention(ConventionRule),
}

// ============================================================================
// SCAN OPTIONS
// ============================================================================

/// Per-batch options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub mode: ScanMode,
    /// Path fragments; a candidate containing any of them is skipped.
    pub excluded: Vec<String>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convention(mut self, rule: ConventionRule) -> Self {
        self.mode = ScanMode::Convention(rule);
        self
    }

    /// Skip candidates whose path contains `fragment`.
    pub fn exclude(mut self, fragment: impl AsRef<str>) -> Self {
        self.excluded.push(normalize_separators(fragment.as_ref()));
        self
    }

    /// Whether `path` matches one of the excluded fragments.
    pub fn is_excluded(&self, path: &str) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let path = normalize_separators(path);
        self.excluded
            .iter()
            .any(|fragment| !fragment.is_empty() && path.contains(fragment.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        let config = GeneratorConfig::default();

        assert!(config.accepts_extension(Some("php")));
        assert!(config.accepts_extension(Some("PHP")));
        assert!(config.accepts_extension(Some("inc")));
        assert!(!config.accepts_extension(Some("txt")));
        assert!(!config.accepts_extension(None));
    }

    #[test]
    fn test_custom_extensions_strip_dot() {
        let config = GeneratorConfig::new().with_extensions([".PHTML"]);

        assert_eq!(config.extensions, vec!["phtml"]);
        assert!(config.accepts_extension(Some("phtml")));
        assert!(!config.accepts_extension(Some("php")));
    }

    #[test]
    fn test_rule_prefix_normalized() {
        assert_eq!(ConventionRule::psr4("\\Foo\\Bar", "src").prefix.as_str(), "Foo\\Bar\\");
        assert_eq!(ConventionRule::psr4("Foo\\", "src").prefix.as_str(), "Foo\\");
        assert_eq!(ConventionRule::psr0("", "src").prefix.as_str(), "");
    }

    #[test]
    fn test_rule_base_dir_separators() {
        assert_eq!(ConventionRule::psr4("A", "C:\\app\\src").base_dir, "C:/app/src");
    }

    #[test]
    fn test_exclusion_fragments() {
        let options = ScanOptions::new().exclude("/vendor/").exclude("Legacy\\");

        assert!(options.is_excluded("/app/vendor/x/A.php"));
        assert!(options.is_excluded("C:\\app\\Legacy\\A.php"));
        assert!(!options.is_excluded("/app/src/A.php"));
    }

    #[test]
    fn test_scan_source_conversions() {
        assert_eq!(ScanSource::from("src"), ScanSource::Path("src".into()));
        assert_eq!(
            ScanSource::from(vec!["a.php".to_string()]),
            ScanSource::Files(vec!["a.php".into()])
        );
    }
}
