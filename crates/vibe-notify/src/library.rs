//! Sound identifier lookup.
//!
//! [`SoundLibrary`] maps the identifiers from `config.json` to absolute file
//! paths. Relative entries resolve against the configuration directory, so
//! the default `sounds/jobs-done.mp3` works no matter where the tool is run
//! from.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use vibe_core::Config;

use crate::error::NotifyError;

/// Resolved sound identifiers and the fallback identifier.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use vibe_core::Config;
/// use vibe_notify::SoundLibrary;
///
/// let library = SoundLibrary::from_config(&Config::default(), Utf8Path::new("/opt/vibe"));
/// assert_eq!(
///     library.resolve("wow").unwrap(),
///     Utf8Path::new("/opt/vibe/sounds/wow.mp3")
/// );
/// // Unknown identifiers fall back to the default sound.
/// assert_eq!(
///     library.resolve("kazoo").unwrap(),
///     Utf8Path::new("/opt/vibe/sounds/jobs-done.mp3")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundLibrary {
    sounds: BTreeMap<String, Utf8PathBuf>,
    default_sound: String,
}

impl SoundLibrary {
    /// Builds the library from configuration, resolving relative paths
    /// against `base_dir`.
    #[must_use]
    pub fn from_config(config: &Config, base_dir: &Utf8Path) -> Self {
        let sounds = config
            .sound_files
            .iter()
            .map(|(name, path)| {
                let resolved = if path.is_absolute() {
                    path.clone()
                } else {
                    base_dir.join(path)
                };
                (name.clone(), resolved)
            })
            .collect();

        Self {
            sounds,
            default_sound: config.settings.default_sound.clone(),
        }
    }

    /// Returns the file for `sound`, or for the default sound if `sound` is
    /// not configured.
    pub fn resolve(&self, sound: &str) -> Result<&Utf8Path, NotifyError> {
        self.sounds
            .get(sound)
            .or_else(|| self.sounds.get(&self.default_sound))
            .map(Utf8PathBuf::as_path)
            .ok_or_else(|| NotifyError::UnknownSound(sound.to_owned()))
    }

    /// Returns the fallback identifier.
    #[must_use]
    pub fn default_sound(&self) -> &str {
        &self.default_sound
    }

    /// Iterates over identifiers and their resolved paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Utf8Path)> {
        self.sounds
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Returns the number of configured sounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Returns `true` if no sounds are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(sounds: &[(&str, &str)], default_sound: &str) -> Config {
        let mut config = Config::default();
        config.sound_files = sounds
            .iter()
            .map(|(name, path)| ((*name).to_owned(), Utf8PathBuf::from(*path)))
            .collect();
        config.settings.default_sound = default_sound.to_owned();
        config
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let config = config_with(&[("ding", "audio/ding.wav")], "ding");
        let library = SoundLibrary::from_config(&config, Utf8Path::new("/etc/vibe"));
        assert_eq!(
            library.resolve("ding").unwrap(),
            Utf8Path::new("/etc/vibe/audio/ding.wav")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let config = config_with(&[("ding", "/usr/share/sounds/ding.wav")], "ding");
        let library = SoundLibrary::from_config(&config, Utf8Path::new("/etc/vibe"));
        assert_eq!(
            library.resolve("ding").unwrap(),
            Utf8Path::new("/usr/share/sounds/ding.wav")
        );
    }

    #[test]
    fn test_unknown_sound_without_default() {
        let config = config_with(&[("ding", "ding.wav")], "missing-default");
        let library = SoundLibrary::from_config(&config, Utf8Path::new("/base"));
        assert!(matches!(
            library.resolve("kazoo"),
            Err(NotifyError::UnknownSound(name)) if name == "kazoo"
        ));
    }

    #[test]
    fn test_iter_is_sorted() {
        let library = SoundLibrary::from_config(&Config::default(), Utf8Path::new("/base"));
        let names: Vec<_> = library.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["dolphin", "jobs-done", "wow"]);
        assert_eq!(library.len(), 3);
        assert!(!library.is_empty());
        assert_eq!(library.default_sound(), "jobs-done");
    }
}
