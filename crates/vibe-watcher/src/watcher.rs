//! File watcher with async event streaming.
//!
//! This module provides the [`FileWatcher`] type that bridges the synchronous
//! `notify` file watching crate to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)             │
//! │  ┌──────────────────┐    ┌────────────────┐    ┌────────────┐  │
//! │  │ RecommendedWatcher│ -> │ Debouncer      │ -> │ Callback   │  │
//! │  │ (notify)         │    │ (100ms window) │    │ (exclusion)│  │
//! │  └──────────────────┘    └────────────────┘    └─────┬──────┘  │
//! └──────────────────────────────────────────────────────│─────────┘
//!                                                        │
//!                                          blocking_send │
//!                                                        ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐    ┌────────────────┐                     │
//! │  │ FileWatcher      │    │ mpsc::Receiver │ -> monitor session  │
//! │  │ (shutdown ctrl)  │    │ (events)       │                     │
//! │  └──────────────────┘    └────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend errors reported by `notify` while watching are forwarded through
//! the same channel as [`WatchError::Notify`] so the consumer can end the
//! session.
//!
//! # Usage
//!
//! ```no_run
//! use vibe_core::{ExclusionRules, WatchConfig};
//! use vibe_watcher::{ExclusionFilter, FileWatcher};
//! use camino::Utf8Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let filter = ExclusionFilter::new(&ExclusionRules::new(["*.tmp"], ["node_modules"]));
//!     let mut watcher =
//!         FileWatcher::new(Utf8Path::new("./project"), &WatchConfig::default(), filter).await?;
//!
//!     while let Some(event) = watcher.recv().await {
//!         println!("File changed: {}", event?.path);
//!     }
//!
//!     Ok(())
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use vibe_core::WatchConfig;

use crate::error::WatchError;
use crate::events::FileEvent;
use crate::filter::FileFilter;

/// Default channel capacity for file events.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Item delivered by the watcher: an accepted event or a backend failure.
pub type WatchResult = Result<FileEvent, WatchError>;

/// A file watcher that streams events to an async context.
///
/// `FileWatcher` manages a background thread that runs the `notify` file watcher
/// with debouncing. Events are filtered on that thread and sent through a
/// tokio mpsc channel for consumption in async code.
///
/// # Lifecycle
///
/// 1. **Creation**: `FileWatcher::new()` validates the path, creates channels,
///    and spawns a blocking task with the notify watcher.
///
/// 2. **Event Reception**: Use `recv()` to receive events. Events are already
///    filtered according to the provided filter.
///
/// 3. **Shutdown**: Call `shutdown()` for graceful shutdown, or simply drop
///    the watcher. Either way the watch registration is released.
pub struct FileWatcher {
    /// Shutdown signal sender. `None` after shutdown is initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<WatchResult>,

    /// The canonical path being watched.
    watch_path: Utf8PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Creates a new file watcher for the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist.
    /// Returns [`WatchError::Io`] if the path cannot be canonicalized.
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn new<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
    ) -> Result<Self, WatchError> {
        Self::with_capacity(path, config, filter, DEFAULT_CHANNEL_CAPACITY).await
    }

    /// Creates a file watcher with a custom channel capacity.
    ///
    /// A larger capacity absorbs bursts (e.g. a full rebuild) without
    /// back-pressuring the notify thread.
    #[allow(clippy::unused_async)] // Async for API consistency with shutdown()
    pub async fn with_capacity<F: FileFilter>(
        path: &Utf8Path,
        config: &WatchConfig,
        filter: F,
        channel_capacity: usize,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }

        let watch_path = path.canonicalize_utf8().map_err(WatchError::Io)?;

        let (event_tx, event_rx) = mpsc::channel(channel_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let config = *config;

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(task_path, config, event_tx, shutdown_rx, filter)
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
        })
    }

    /// Receives the next event asynchronously.
    ///
    /// Returns `None` when the watcher thread has stopped and every buffered
    /// event has been consumed.
    pub async fn recv(&mut self) -> Option<WatchResult> {
        self.event_rx.recv().await
    }

    /// Returns a mutable reference to the event receiver.
    ///
    /// Useful with `tokio::select!` or when a consumer is written against a
    /// plain receiver.
    pub fn events(&mut self) -> &mut mpsc::Receiver<WatchResult> {
        &mut self.event_rx
    }

    /// Returns the canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns `true` if the watcher is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Gracefully shuts down the watcher.
    ///
    /// Sends the shutdown signal, waits for the watcher thread to release
    /// its registration, and returns any error it ended with.
    ///
    /// # Errors
    ///
    /// Returns the watcher thread's setup error, or
    /// [`WatchError::ChannelClosed`] if the thread panicked.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        // The task stops once it sees the signal; Drop cannot await it.
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Runs the notify watcher loop in a blocking context.
///
/// Called from `spawn_blocking`; forwards filtered events and backend errors
/// to the async channel until the shutdown signal arrives.
#[allow(clippy::needless_pass_by_value)] // Owned values live for the blocking task lifetime
fn run_watcher_loop<F: FileFilter>(
    path: Utf8PathBuf,
    config: WatchConfig,
    event_tx: mpsc::Sender<WatchResult>,
    shutdown_rx: oneshot::Receiver<()>,
    filter: F,
) -> Result<(), WatchError> {
    let tx = event_tx;
    let root = path.clone();
    let debouncer_result: Result<Debouncer<notify::RecommendedWatcher>, notify::Error> =
        new_debouncer(config.debounce(), move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    let utf8_path = match Utf8PathBuf::try_from(event.path) {
                        Ok(p) => p,
                        Err(e) => {
                            let err = WatchError::non_utf8_path(e.into_path_buf());
                            tracing::warn!(error = %err, "Skipping file event");
                            continue;
                        }
                    };

                    let is_dir = utf8_path.is_dir();
                    if !filter.should_process(relative_to_root(&utf8_path, &root), is_dir) {
                        tracing::trace!(path = %utf8_path, is_dir, "Filtered out file event");
                        continue;
                    }

                    if tx.blocking_send(Ok(FileEvent::new(utf8_path, is_dir))).is_err() {
                        tracing::debug!("Event channel closed, stopping watcher");
                        break;
                    }
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "File watcher backend failed");
                let _ = tx.blocking_send(Err(WatchError::Notify(error)));
            }
        });

    let mut debouncer = debouncer_result?;

    let mode = if config.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    debouncer.watcher().watch(path.as_std_path(), mode)?;

    tracing::info!(path = %path, recursive = config.recursive, "File watcher started");

    // Block until shutdown; a dropped sender counts as shutdown too.
    let _ = shutdown_rx.blocking_recv();

    if let Err(error) = debouncer.watcher().unwatch(path.as_std_path()) {
        tracing::debug!(error = %error, "Failed to unwatch path during shutdown");
    }

    tracing::info!(path = %path, "File watcher stopped");

    Ok(())
}

/// Strips the watch root from an event path.
///
/// Rules only ever see the part of the path inside the watched tree, so the
/// root's own ancestors (`/tmp`, `~/build`, ...) never match a folder rule.
/// Paths outside the root are returned unchanged.
fn relative_to_root<'a>(path: &'a Utf8Path, root: &Utf8Path) -> &'a Utf8Path {
    path.strip_prefix(root).unwrap_or(path)
}
