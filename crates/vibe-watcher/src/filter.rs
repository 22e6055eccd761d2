//! File filtering for watch events.
//!
//! Filters run on the watcher thread, so excluded events never reach the
//! event channel.
//!
//! # Matching Policy
//!
//! [`ExclusionFilter`] applies two checks to every file event:
//!
//! - **Folders**: the event's parent directory is lexically normalized and
//!   lowercased. A folder rule (normalized the same way) excludes the event if
//!   the directory starts with it or contains it anywhere. Rules therefore
//!   match at any depth, and a rule such as `logs` also matches an unrelated
//!   `/srv/catalogs/` directory.
//! - **File names**: a rule starting with `*` excludes names ending with the
//!   rest of the rule (`*.tmp`); any other rule must equal the file name
//!   exactly. File names compare case-sensitively. Substring matching on file
//!   names is not supported.
//!
//! Directory events are always ignored.
//!
//! # Examples
//!
//! ```
//! use vibe_core::ExclusionRules;
//! use vibe_watcher::ExclusionFilter;
//! use camino::Utf8Path;
//!
//! let rules = ExclusionRules::new(["debug.log", "*.tmp"], ["node_modules"]);
//! let filter = ExclusionFilter::new(&rules);
//!
//! assert!(filter.should_ignore(Utf8Path::new("/project/Node_Modules/foo.js"), false));
//! assert!(filter.should_ignore(Utf8Path::new("/project/scratch.tmp"), false));
//! assert!(!filter.should_ignore(Utf8Path::new("/project/src/app.js"), false));
//! ```

use camino::Utf8Path;
use smallvec::SmallVec;
use vibe_core::ExclusionRules;

/// A filter for determining which file events to process.
///
/// Implementations are called for each event detected by the watcher. Events
/// for which [`should_process`] returns `false` are discarded before being
/// sent to the event channel.
///
/// # Thread Safety
///
/// Filters must be [`Send`] and [`Sync`] because they are used from the
/// blocking watcher thread, and `'static` to be moved into it.
///
/// [`should_process`]: FileFilter::should_process
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if the event for `path` should be processed.
    ///
    /// [`FileWatcher`](crate::FileWatcher) passes `path` relative to the
    /// watch root. `is_dir` reports whether the path was a directory when
    /// observed.
    fn should_process(&self, path: &Utf8Path, is_dir: bool) -> bool;
}

/// A filter that accepts every event, directories included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path, _is_dir: bool) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FilePattern {
    /// `*suffix`: the file name must end with the suffix.
    Suffix(String),
    /// The file name must match exactly.
    Exact(String),
}

impl FilePattern {
    fn parse(rule: &str) -> Self {
        match rule.strip_prefix('*') {
            Some(suffix) => Self::Suffix(suffix.to_owned()),
            None => Self::Exact(rule.to_owned()),
        }
    }

    fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
            Self::Exact(name) => file_name == name,
        }
    }
}

/// Ignores events from excluded folders and excluded file names.
///
/// Built once from [`ExclusionRules`]; folder rules are normalized and
/// lowercased up front so each event only normalizes its own directory.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    files: SmallVec<[FilePattern; 8]>,
    folders: SmallVec<[String; 16]>,
}

impl ExclusionFilter {
    /// Compiles the given rules into a filter.
    #[must_use]
    pub fn new(rules: &ExclusionRules) -> Self {
        Self {
            files: rules.files().iter().map(|r| FilePattern::parse(r)).collect(),
            folders: rules
                .folders()
                .iter()
                .map(|r| normalize_lexical(r).to_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if a change to `path` must not count as activity.
    pub fn should_ignore(&self, path: &Utf8Path, is_directory: bool) -> bool {
        if is_directory {
            return true;
        }

        let parent = path.parent().map_or("", Utf8Path::as_str);
        if self.is_excluded_folder(parent) {
            return true;
        }

        let file_name = path.file_name().unwrap_or_default();
        self.files.iter().any(|pattern| pattern.matches(file_name))
    }

    fn is_excluded_folder(&self, dir: &str) -> bool {
        if self.folders.is_empty() {
            return false;
        }
        let dir = normalize_lexical(dir).to_lowercase();
        self.folders
            .iter()
            .any(|rule| dir.starts_with(rule.as_str()) || dir.contains(rule.as_str()))
    }
}

impl FileFilter for ExclusionFilter {
    fn should_process(&self, path: &Utf8Path, is_dir: bool) -> bool {
        !self.should_ignore(path, is_dir)
    }
}

/// Lexically normalizes a path string.
///
/// Collapses repeated separators and `.` segments, and resolves `..` against
/// the preceding segment without touching the filesystem. Both `/` and `\`
/// are treated as separators; the result always uses `/`. An empty result
/// becomes `.` (or `/` for rooted paths).
///
/// # Examples
///
/// ```
/// use vibe_watcher::filter::normalize_lexical;
///
/// assert_eq!(normalize_lexical("/a//b/./c/../d"), "/a/b/d");
/// assert_eq!(normalize_lexical("wp-content\\uploads\\"), "wp-content/uploads");
/// assert_eq!(normalize_lexical("../x"), "../x");
/// assert_eq!(normalize_lexical(""), ".");
/// ```
#[must_use]
pub fn normalize_lexical(path: &str) -> String {
    let rooted = path.starts_with(['/', '\\']);
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}
