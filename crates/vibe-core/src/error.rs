//! Error types for the vibe-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related errors
//! that can occur across the workspace.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// This error type covers reading and writing the JSON configuration file,
/// parsing override pattern files, and validating user-supplied options.
///
/// # Examples
///
/// ```
/// use vibe_core::ConfigError;
///
/// let error = ConfigError::UnknownSound {
///     sound: "kazoo".to_owned(),
///     available: vec!["jobs-done".to_owned(), "wow".to_owned()],
/// };
/// assert!(error.to_string().contains("kazoo"));
/// assert!(error.to_string().contains("jobs-done, wow"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// A sound identifier is not present in `sound_files`.
    #[error("unknown sound '{sound}' (available: {})", available.join(", "))]
    UnknownSound {
        /// The requested identifier.
        sound: String,
        /// The configured identifiers.
        available: Vec<String>,
    },

    /// An exclusion override file could not be read.
    #[error("failed to read pattern file '{path}': {source}")]
    PatternFile {
        /// The override file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("failed to access configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("volume", "must be between 0.0 and 1.0");
        let msg = error.to_string();
        assert!(msg.contains("volume"));
        assert!(msg.contains("between 0.0 and 1.0"));
    }

    #[test]
    fn test_unknown_sound_lists_available() {
        let error = ConfigError::UnknownSound {
            sound: "kazoo".to_owned(),
            available: vec!["dolphin".to_owned(), "jobs-done".to_owned()],
        };
        assert_eq!(
            error.to_string(),
            "unknown sound 'kazoo' (available: dolphin, jobs-done)"
        );
    }

    #[test]
    fn test_pattern_file_display() {
        let error = ConfigError::PatternFile {
            path: Utf8PathBuf::from("/missing/excludes.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = error.to_string();
        assert!(msg.contains("/missing/excludes.txt"));
        assert!(msg.contains("not found"));
    }
}
