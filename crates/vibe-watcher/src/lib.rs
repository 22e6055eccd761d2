//! File watching and quiet-period detection for vibe-monitor.
//!
//! This crate provides file change detection via the `notify` crate with
//! debouncing through `notify-debouncer-mini`, exclusion filtering on the
//! watcher thread, and the [`DebounceTracker`] that decides when a watched
//! tree has gone quiet.
//!
//! # Architecture
//!
//! ```text
//!  notify ──► debouncer-mini ──► ExclusionFilter ──► mpsc ──► DebounceTracker
//!  (blocking thread)                                          (async session)
//! ```
//!
//! # Crate Dependencies
//!
//! ```text
//! vibe-cli ──► vibe-watcher ──► vibe-core
//!          └─► vibe-notify ───►
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//! use camino::Utf8Path;
//! use vibe_core::Config;
//! use vibe_watcher::{DebounceTracker, ExclusionFilter, FileWatcher};
//!
//! # async fn example() -> Result<(), vibe_watcher::WatchError> {
//! let config = Config::default();
//! let filter = ExclusionFilter::new(&config.exclusion_rules());
//! let mut watcher = FileWatcher::new(Utf8Path::new("./project"), &config.watch, filter).await?;
//! let mut tracker = DebounceTracker::new("jobs-done", config.quiet_threshold());
//! let mut tick = tokio::time::interval(Duration::from_secs(1));
//!
//! loop {
//!     tokio::select! {
//!         Some(event) = watcher.recv() => {
//!             let event = event?;
//!             tracker.record_change(&event.path, Instant::now());
//!         }
//!         _ = tick.tick() => {
//!             if let Some(sound) = tracker.check_completion(Instant::now()) {
//!                 println!("quiet; play {sound}");
//!             }
//!         }
//!     }
//! }
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod debounce;
pub mod error;
pub mod events;
pub mod filter;
pub mod watcher;

pub use debounce::{DebounceTracker, TrackerState};
pub use error::WatchError;
pub use events::FileEvent;
pub use filter::{AcceptAllFilter, ExclusionFilter, FileFilter};
pub use watcher::{FileWatcher, WatchResult};
