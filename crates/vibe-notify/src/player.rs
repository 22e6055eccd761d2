//! Audio playback through rodio.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8Path;
use rodio::{Decoder, OutputStream, Sink};
use vibe_core::config::clamp_volume;

use crate::Notifier;
use crate::error::NotifyError;
use crate::library::SoundLibrary;

/// Plays notification sounds on the default output device.
///
/// Each call opens the device, plays the file to completion at the configured
/// volume, and releases the device. Playback runs on tokio's blocking pool
/// and the returned future resolves only once the sound has finished.
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    library: Arc<SoundLibrary>,
    volume: f32,
}

impl SoundPlayer {
    /// Creates a player; `volume` is clamped like the configured volume.
    #[must_use]
    pub fn new(library: SoundLibrary, volume: f32) -> Self {
        Self {
            library: Arc::new(library),
            volume: clamp_volume(volume),
        }
    }

    /// Returns the sound library.
    #[must_use]
    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    /// Returns the playback volume.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }
}

#[async_trait]
impl Notifier for SoundPlayer {
    async fn notify(&self, sound: &str) -> Result<(), NotifyError> {
        let path = self.library.resolve(sound)?.to_owned();
        tracing::info!(sound, path = %path, "Attempting to play sound file");

        if !path.is_file() {
            return Err(NotifyError::SoundFileMissing(path));
        }

        let volume = self.volume;
        tokio::task::spawn_blocking(move || play_to_end(&path, volume))
            .await
            .map_err(|e| NotifyError::TaskFailed(e.to_string()))??;

        tracing::info!(sound, "Sound playback completed");
        Ok(())
    }
}

/// Decodes `path` and blocks until playback finishes.
fn play_to_end(path: &Utf8Path, volume: f32) -> Result<(), NotifyError> {
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;

    // The stream must outlive the sink or playback stops immediately.
    let (_stream, handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&handle)?;
    sink.set_volume(volume);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
