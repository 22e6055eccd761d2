//! Event types for file change notifications.
//!
//! # Event Flow
//!
//! ```text
//! File System Change
//!        │
//!        ▼
//! notify-debouncer-mini (100ms debounce)
//!        │
//!        ▼
//! FileFilter (exclusions) ── ignored ──► dropped
//!        │
//!        ▼
//!   FileEvent sent via channel to the monitor session
//! ```

use camino::Utf8PathBuf;
use std::time::Instant;

/// A file change event with a UTF-8 path guarantee.
///
/// The event does not distinguish between create, modify, or delete
/// operations; any of them counts as activity.
///
/// # Examples
///
/// ```
/// use vibe_watcher::FileEvent;
/// use camino::Utf8PathBuf;
///
/// let event = FileEvent::new(Utf8PathBuf::from("src/main.rs"), false);
/// assert_eq!(event.path.as_str(), "src/main.rs");
/// assert_eq!(event.file_name(), Some("main.rs"));
/// assert!(!event.is_dir);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// The path of the file that changed.
    pub path: Utf8PathBuf,

    /// Whether the path referred to a directory when the event was observed.
    pub is_dir: bool,

    /// The timestamp when this event was received.
    ///
    /// Uses [`Instant`] for monotonic timing, suitable for measuring
    /// elapsed time but not for wall-clock display.
    pub timestamp: Instant,
}

impl FileEvent {
    /// Creates a new file event for the given path, stamped with the current instant.
    #[inline]
    #[must_use]
    pub fn new(path: Utf8PathBuf, is_dir: bool) -> Self {
        Self::with_timestamp(path, is_dir, Instant::now())
    }

    /// Creates a new file event with a specific timestamp.
    #[inline]
    #[must_use]
    pub const fn with_timestamp(path: Utf8PathBuf, is_dir: bool, timestamp: Instant) -> Self {
        Self {
            path,
            is_dir,
            timestamp,
        }
    }

    /// Returns the file name without the directory path.
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}
