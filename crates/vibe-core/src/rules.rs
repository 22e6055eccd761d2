//! Exclusion rules for file change events.
//!
//! [`ExclusionRules`] holds the raw patterns from configuration or override
//! files. Matching lives in `vibe-watcher`; this module only collects,
//! cleans, and overrides rule lists.
//!
//! # Override Files
//!
//! Override files list one rule per line. Lines are trimmed, and blank lines
//! and lines starting with `#` are skipped:
//!
//! ```text
//! # generated artefacts
//! *.map
//! coverage.json
//! ```

use camino::Utf8Path;
use smallvec::SmallVec;

use crate::error::ConfigError;

/// File-name patterns and folder fragments to disregard.
///
/// File patterns are either an exact file name (`debug.log`) or a
/// `*`-prefixed suffix (`*.tmp`). Folder fragments are compared against the
/// normalized parent directory of each event, case-insensitively.
///
/// Blank rules are dropped on construction. Rules are immutable after
/// construction apart from wholesale overrides.
///
/// # Examples
///
/// ```
/// use vibe_core::ExclusionRules;
///
/// let rules = ExclusionRules::new(["*.tmp", "", "debug.log"], ["node_modules"]);
/// assert_eq!(rules.files(), ["*.tmp", "debug.log"]);
/// assert_eq!(rules.folders(), ["node_modules"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    files: SmallVec<[String; 8]>,
    folders: SmallVec<[String; 16]>,
}

impl ExclusionRules {
    /// Creates rules from file patterns and folder fragments.
    pub fn new<F, D>(files: F, folders: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            files: non_blank(files),
            folders: non_blank(folders),
        }
    }

    /// Returns the file-name patterns in order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Returns the folder fragments in order.
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Returns `true` if there are no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }

    /// Replaces the file patterns, unless `files` holds no usable rule.
    #[must_use]
    pub fn with_file_overrides<I>(mut self, files: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let files = non_blank(files);
        if !files.is_empty() {
            self.files = files;
        }
        self
    }

    /// Replaces the folder fragments, unless `folders` holds no usable rule.
    #[must_use]
    pub fn with_folder_overrides<I>(mut self, folders: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let folders = non_blank(folders);
        if !folders.is_empty() {
            self.folders = folders;
        }
        self
    }
}

fn non_blank<I, A>(items: I) -> SmallVec<A>
where
    I: IntoIterator,
    I::Item: Into<String>,
    A: smallvec::Array<Item = String>,
{
    items
        .into_iter()
        .map(Into::into)
        .filter(|rule: &String| !rule.trim().is_empty())
        .collect()
}

/// Parses newline-delimited rules, skipping blanks and `#` comments.
///
/// # Examples
///
/// ```
/// use vibe_core::parse_pattern_list;
///
/// let rules = parse_pattern_list("# comment\n\n  *.log  \nvendor\n");
/// assert_eq!(rules, vec!["*.log", "vendor"]);
/// ```
#[must_use]
pub fn parse_pattern_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Reads an override file and parses it with [`parse_pattern_list`].
pub fn read_pattern_file(path: &Utf8Path) -> Result<Vec<String>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::PatternFile {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse_pattern_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_blank_rules_are_dropped() {
        let rules = ExclusionRules::new(["", "  ", "*.swp"], ["\t", "dist"]);
        assert_eq!(rules.files(), ["*.swp"]);
        assert_eq!(rules.folders(), ["dist"]);
    }

    #[test]
    fn test_rule_order_is_preserved() {
        let rules = ExclusionRules::new(["b", "a", "c"], Vec::<String>::new());
        assert_eq!(rules.files(), ["b", "a", "c"]);
        assert!(rules.folders().is_empty());
    }

    #[test]
    fn test_empty_rules() {
        assert!(ExclusionRules::default().is_empty());
        assert!(!ExclusionRules::new(["x"], Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_overrides_replace_lists() {
        let rules = ExclusionRules::new(["debug.log"], ["node_modules"])
            .with_file_overrides(vec!["*.bak".to_owned()])
            .with_folder_overrides(vec!["vendor".to_owned(), "target".to_owned()]);
        assert_eq!(rules.files(), ["*.bak"]);
        assert_eq!(rules.folders(), ["vendor", "target"]);
    }

    #[test]
    fn test_empty_override_keeps_configured_rules() {
        let rules = ExclusionRules::new(["debug.log"], ["node_modules"])
            .with_file_overrides(Vec::<String>::new())
            .with_folder_overrides(vec![String::new()]);
        assert_eq!(rules.files(), ["debug.log"]);
        assert_eq!(rules.folders(), ["node_modules"]);
    }

    #[test]
    fn test_parse_pattern_list() {
        let text = "# Ignore editor files\n*.swp\n\n   \n  .idea  \n#*.log\n";
        assert_eq!(parse_pattern_list(text), vec!["*.swp", ".idea"]);
        assert!(parse_pattern_list("").is_empty());
        assert!(parse_pattern_list("# only\n# comments").is_empty());
    }

    #[test]
    fn test_parse_pattern_list_crlf() {
        assert_eq!(parse_pattern_list("a.txt\r\nb.txt\r\n"), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_read_pattern_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("folders.txt")).unwrap();
        std::fs::write(&path, "coverage\n# skip\nvendor/cache\n").unwrap();

        let rules = read_pattern_file(&path).unwrap();
        assert_eq!(rules, vec!["coverage", "vendor/cache"]);
    }

    #[test]
    fn test_read_missing_pattern_file() {
        let err = read_pattern_file(Utf8Path::new("/nonexistent/patterns.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::PatternFile { .. }));
        assert!(err.to_string().contains("/nonexistent/patterns.txt"));
    }
}
