//! Configuration structures for the vibe-monitor tool.
//!
//! This module provides the types backing the `config.json` document:
//!
//! - [`Config`] - Root configuration (exclusions, sounds, settings)
//! - [`Settings`] - Default sound, quiet delay, and playback volume
//! - [`WatchConfig`] - File watcher settings (debouncing, recursion, polling)
//!
//! All configuration types implement [`Default`] and deserialize with
//! `#[serde(default)]`, so a document may omit any key.

use std::collections::BTreeMap;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::ExclusionRules;

/// File name of the configuration document.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Notification settings.
///
/// # Examples
///
/// ```
/// use vibe_core::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.default_sound, "jobs-done");
/// assert_eq!(settings.default_delay, 60.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound identifier played when no `--sound` is given.
    pub default_sound: String,

    /// Seconds of inactivity before the notification fires.
    ///
    /// Fractional values are allowed. A negative or non-finite value falls
    /// back to [`Settings::FALLBACK_DELAY`].
    pub default_delay: f64,

    /// Playback volume in `[0.0, 1.0]`.
    pub default_volume: f32,
}

impl Settings {
    /// Volume used when the configured value is unusable.
    pub const FALLBACK_VOLUME: f32 = 0.5;

    /// Delay in seconds used when the configured value is unusable.
    pub const FALLBACK_DELAY: f64 = 60.0;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sound: "jobs-done".to_owned(),
            default_delay: Self::FALLBACK_DELAY,
            default_volume: Self::FALLBACK_VOLUME,
        }
    }
}

/// Configuration for the file watcher.
///
/// Controls how file changes are detected and how often the quiet period
/// is checked.
///
/// # Examples
///
/// ```
/// use vibe_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 100);
/// assert_eq!(config.poll_interval_ms, 1000);
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    ///
    /// Raw notifications for the same path within this window collapse into one event.
    pub debounce_ms: u64,

    /// Whether to watch subdirectories recursively.
    pub recursive: bool,

    /// Interval between quiet-period checks in milliseconds.
    pub poll_interval_ms: u64,
}

impl WatchConfig {
    /// Returns the debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns the poll interval as a [`Duration`], never shorter than 1ms.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            Duration::from_millis(1)
        } else {
            Duration::from_millis(self.poll_interval_ms)
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            recursive: true,
            poll_interval_ms: 1000,
        }
    }
}

/// Root configuration for the vibe-monitor tool.
///
/// Mirrors the on-disk `config.json` document. Relative paths in
/// [`sound_files`](Self::sound_files) are resolved against the directory
/// containing the configuration file.
///
/// # Examples
///
/// ```
/// use vibe_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"settings": {"default_delay": 5}}"#)?;
/// assert_eq!(config.quiet_threshold().as_secs(), 5);
/// assert_eq!(config.settings.default_sound, "jobs-done");
/// assert!(config.excluded_folders.iter().any(|f| f == "node_modules"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File-name patterns to ignore (`name` or `*suffix`).
    pub excluded_files: Vec<String>,

    /// Folder fragments to ignore, matched case-insensitively.
    pub excluded_folders: Vec<String>,

    /// Sound identifier to audio file path.
    pub sound_files: BTreeMap<String, Utf8PathBuf>,

    /// Notification settings.
    pub settings: Settings,

    /// File watcher configuration.
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| (*s).to_owned()).collect() };
        Self {
            excluded_files: owned(&[
                "debug.log",
                ".DS_Store",
                "Thumbs.db",
                "*.tmp",
                "*.temp",
                "*.swp",
                "*.lock",
            ]),
            excluded_folders: owned(&[
                "node_modules",
                ".git",
                "__pycache__",
                "logs",
                "tmp",
                "temp",
                "cache",
                "dist",
                "build",
            ]),
            sound_files: [
                ("jobs-done", "sounds/jobs-done.mp3"),
                ("dolphin", "sounds/dolphin.mp3"),
                ("wow", "sounds/wow.mp3"),
            ]
            .into_iter()
            .map(|(name, path)| (name.to_owned(), Utf8PathBuf::from(path)))
            .collect(),
            settings: Settings::default(),
            watch: WatchConfig::default(),
        }
    }
}

/// How [`Config::load_or_default`] obtained its configuration.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file existed and parsed successfully.
    Loaded,
    /// The file was missing; defaults were written to it.
    CreatedDefault,
    /// The file was missing and writing the defaults failed.
    DefaultWriteFailed(ConfigError),
    /// The file existed but could not be read or parsed; defaults are in use.
    Fallback(ConfigError),
}

impl Config {
    /// Parses a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Writes this configuration to `path` as pretty-printed JSON.
    ///
    /// Missing parent directories are created.
    pub fn write(&self, path: &Utf8Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads the configuration at `path`, falling back to defaults.
    ///
    /// A missing file is replaced by a freshly written default document. An
    /// unreadable or corrupt file is left untouched. Neither case is fatal;
    /// the returned [`LoadOutcome`] tells the caller what happened.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use vibe_core::{Config, LoadOutcome};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = Utf8PathBuf::from_path_buf(dir.path().join("config.json")).unwrap();
    ///
    /// let (config, outcome) = Config::load_or_default(&path);
    /// assert!(matches!(outcome, LoadOutcome::CreatedDefault));
    /// assert_eq!(config, Config::default());
    /// assert!(path.exists());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn load_or_default(path: &Utf8Path) -> (Self, LoadOutcome) {
        if path.exists() {
            return match Self::read(path) {
                Ok(config) => (config, LoadOutcome::Loaded),
                Err(e) => (Self::default(), LoadOutcome::Fallback(e)),
            };
        }

        let config = Self::default();
        let outcome = match config.write(path) {
            Ok(()) => LoadOutcome::CreatedDefault,
            Err(e) => LoadOutcome::DefaultWriteFailed(e),
        };
        (config, outcome)
    }

    /// Returns the configured quiet threshold.
    ///
    /// An unusable `default_delay` yields [`Settings::FALLBACK_DELAY`].
    #[must_use]
    pub fn quiet_threshold(&self) -> Duration {
        Duration::try_from_secs_f64(self.settings.default_delay)
            .unwrap_or_else(|_| Duration::from_secs_f64(Settings::FALLBACK_DELAY))
    }

    /// Returns the configured volume, see [`clamp_volume`].
    #[must_use]
    pub fn volume(&self) -> f32 {
        clamp_volume(self.settings.default_volume)
    }

    /// Returns the configured sound identifiers in sorted order.
    pub fn sound_names(&self) -> impl Iterator<Item = &str> {
        self.sound_files.keys().map(String::as_str)
    }

    /// Checks that `sound` is a configured identifier.
    pub fn ensure_sound(&self, sound: &str) -> Result<(), ConfigError> {
        if self.sound_files.contains_key(sound) {
            Ok(())
        } else {
            Err(ConfigError::UnknownSound {
                sound: sound.to_owned(),
                available: self.sound_names().map(str::to_owned).collect(),
            })
        }
    }

    /// Builds the exclusion rules described by this configuration.
    #[must_use]
    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::new(
            self.excluded_files.iter().cloned(),
            self.excluded_folders.iter().cloned(),
        )
    }
}

/// Clamps a volume to `[0.0, 1.0]`; NaN yields [`Settings::FALLBACK_VOLUME`].
#[must_use]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        Settings::FALLBACK_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Parses a delay argument in (possibly fractional) seconds.
///
/// Suitable as a clap `value_parser`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vibe_core::config::parse_delay;
///
/// assert_eq!(parse_delay("30.5").ok(), Some(Duration::from_millis(30_500)));
/// assert!(parse_delay("-1").is_err());
/// ```
pub fn parse_delay(value: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_option("delay", format!("'{value}' is not a number")))?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ConfigError::invalid_option("delay", format!("{secs} is not a usable number of seconds"))
    })
}

/// Parses a volume argument, rejecting values outside `[0.0, 1.0]`.
///
/// Suitable as a clap `value_parser`.
///
/// # Examples
///
/// ```
/// use vibe_core::config::parse_volume;
///
/// assert_eq!(parse_volume("0.25").ok(), Some(0.25));
/// assert!(parse_volume("1.5").is_err());
/// assert!(parse_volume("loud").is_err());
/// ```
pub fn parse_volume(value: &str) -> Result<f32, ConfigError> {
    let volume: f32 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_option("volume", format!("'{value}' is not a number")))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(ConfigError::invalid_option(
            "volume",
            format!("{volume} is outside 0.0..=1.0"),
        ))
    }
}
