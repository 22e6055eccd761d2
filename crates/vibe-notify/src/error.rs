//! Error types for the vibe-notify crate.

use camino::Utf8PathBuf;

/// Errors that can occur while resolving or playing a notification sound.
///
/// None of these end a monitoring session; callers log them and keep
/// watching.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Neither the requested sound nor the default sound is configured.
    #[error("no sound file configured for '{0}'")]
    UnknownSound(String),

    /// The configured sound file does not exist.
    #[error("sound file not found at {0}")]
    SoundFileMissing(Utf8PathBuf),

    /// The sound file could not be opened.
    #[error("failed to open sound file: {0}")]
    Io(#[from] std::io::Error),

    /// The sound file is not in a supported audio format.
    #[error("failed to decode sound file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    Device(#[from] rodio::StreamError),

    /// The output device rejected playback.
    #[error("playback failed: {0}")]
    Playback(#[from] rodio::PlayError),

    /// The blocking playback task panicked or was cancelled.
    #[error("playback task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_file_missing_display() {
        let err = NotifyError::SoundFileMissing(Utf8PathBuf::from("/opt/sounds/wow.mp3"));
        assert_eq!(err.to_string(), "sound file not found at /opt/sounds/wow.mp3");
    }

    #[test]
    fn test_unknown_sound_display() {
        let err = NotifyError::UnknownSound("kazoo".to_owned());
        assert!(err.to_string().contains("'kazoo'"));
    }
}
