//! Audible notifications for vibe-monitor.
//!
//! The monitor session depends only on the [`Notifier`] trait; the
//! [`SoundPlayer`] implementation resolves identifiers through a
//! [`SoundLibrary`] and plays them with `rodio`.
//!
//! # Usage
//!
//! ```no_run
//! use camino::Utf8Path;
//! use vibe_core::Config;
//! use vibe_notify::{Notifier, SoundLibrary, SoundPlayer};
//!
//! # async fn example() -> Result<(), vibe_notify::NotifyError> {
//! let config = Config::default();
//! let library = SoundLibrary::from_config(&config, Utf8Path::new("/opt/vibe-monitor"));
//! let player = SoundPlayer::new(library, config.volume());
//!
//! // Resolves once the sound has finished playing.
//! player.notify("jobs-done").await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod library;
pub mod player;

use async_trait::async_trait;

pub use error::NotifyError;
pub use library::SoundLibrary;
pub use player::SoundPlayer;

/// Port for playing a named notification sound.
///
/// `notify` must not resolve until playback has finished, so that a caller
/// awaiting it can never overlap two alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Plays the sound registered under `sound`.
    async fn notify(&self, sound: &str) -> Result<(), NotifyError>;
}

// Shared notifiers (useful when the caller keeps a handle for inspection)
#[async_trait]
impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    async fn notify(&self, sound: &str) -> Result<(), NotifyError> {
        (**self).notify(sound).await
    }
}
