//! The monitor session loop.
//!
//! Wires accepted file events into the [`DebounceTracker`] and fires the
//! [`Notifier`] when the tracker reports a completed quiet period. One task
//! owns the tracker, so change recording and completion checks never
//! interleave.
//!
//! ```text
//!  FileWatcher ──mpsc──┐
//!  interval tick ──────┼──► select! ──► DebounceTracker ──► Notifier
//!  stop signal ────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use vibe_notify::Notifier;
use vibe_watcher::{DebounceTracker, WatchError, WatchResult};

/// Current instant on the session clock.
///
/// Reads tokio's clock so paused-time tests and the poll interval agree.
pub fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Drives one watch session until stopped or the watcher fails.
pub struct Monitor<N> {
    tracker: DebounceTracker,
    notifier: N,
    poll_interval: Duration,
}

impl<N: Notifier> Monitor<N> {
    /// Creates a session around an existing tracker.
    #[must_use]
    pub fn new(tracker: DebounceTracker, notifier: N, poll_interval: Duration) -> Self {
        Self {
            tracker,
            notifier,
            poll_interval,
        }
    }

    /// Returns the session's tracker.
    #[must_use]
    pub fn tracker(&self) -> &DebounceTracker {
        &self.tracker
    }

    /// Runs the session.
    ///
    /// Returns `Ok(())` once `stop` resolves. Returns an error if the watcher
    /// reports a fatal backend failure or its channel closes.
    pub async fn run<S>(
        &mut self,
        events: &mut mpsc::Receiver<WatchResult>,
        stop: S,
    ) -> Result<(), WatchError>
    where
        S: Future<Output = ()>,
    {
        let mut tick = tokio::time::interval(self.poll_interval);
        // Playback blocks the loop; don't burst missed ticks afterwards.
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(stop);

        loop {
            tokio::select! {
                biased;

                () = &mut stop => {
                    info!("Stop requested");
                    return Ok(());
                }

                event = events.recv() => match event {
                    Some(Ok(event)) => self.tracker.record_change(&event.path, now()),
                    Some(Err(e)) if e.is_fatal() => {
                        error!(error = %e, "File watcher failed");
                        return Err(e);
                    }
                    Some(Err(e)) => warn!(error = %e, "Skipping file event"),
                    None => {
                        error!("File watcher stopped unexpectedly");
                        return Err(WatchError::ChannelClosed);
                    }
                },

                _ = tick.tick() => self.poll().await,
            }
        }
    }

    async fn poll(&mut self) {
        let now = now();
        debug!(
            elapsed_secs = self.tracker.elapsed(now).as_secs_f64(),
            "Time since last change"
        );

        let Some(sound) = self.tracker.check_completion(now).map(str::to_owned) else {
            return;
        };

        info!("Activity stopped! Your task is likely complete.");
        if let Err(e) = self.notifier.notify(&sound).await {
            // The latch stays set: no retry until the next change.
            error!(error = %e, sound = %sound, "Failed to play notification");
        }
    }
}

/// Combines the session result with the watcher's shutdown result.
///
/// When the watcher thread dies during setup it drops the channel, so the
/// session only sees [`WatchError::ChannelClosed`]; the real cause is what
/// the thread returned on shutdown.
pub fn settle(
    session: Result<(), WatchError>,
    shutdown: Result<(), WatchError>,
) -> Result<(), WatchError> {
    match (session, shutdown) {
        (Err(WatchError::ChannelClosed), Err(cause)) => Err(cause),
        (session, Err(e)) => {
            warn!(error = %e, "File watcher did not shut down cleanly");
            session
        }
        (session, Ok(())) => session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use tokio::sync::oneshot;
    use tokio::time::sleep;
    use vibe_notify::NotifyError;
    use vibe_watcher::{FileEvent, TrackerState};

    #[derive(Default)]
    struct RecordingNotifier {
        played: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn played(&self) -> Vec<String> {
            self.played.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, sound: &str) -> Result<(), NotifyError> {
            self.played.lock().unwrap().push(sound.to_owned());
            if self.fail {
                Err(NotifyError::SoundFileMissing(Utf8PathBuf::from("/missing.mp3")))
            } else {
                Ok(())
            }
        }
    }

    fn change(path: &str) -> WatchResult {
        Ok(FileEvent::new(Utf8PathBuf::from(path), false))
    }

    fn monitor(
        threshold_secs: u64,
        notifier: &Arc<RecordingNotifier>,
    ) -> Monitor<Arc<RecordingNotifier>> {
        let tracker =
            DebounceTracker::starting_at("jobs-done", Duration::from_secs(threshold_secs), now());
        Monitor::new(tracker, Arc::clone(notifier), Duration::from_secs(1))
    }

    async fn stopped_by(rx: oneshot::Receiver<()>) {
        let _ = rx.await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_burst_of_changes() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(60, &notifier);
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();

        let driver = async {
            // Changes at t=0, 10, 20.
            for _ in 0..3 {
                tx.send(change("/project/src/main.rs")).await.unwrap();
                sleep(Duration::from_secs(10)).await;
            }
            sleep(Duration::from_secs(49)).await; // t=79
            assert!(notifier.played().is_empty());

            sleep(Duration::from_secs(2)).await; // t=81
            assert_eq!(notifier.played(), vec!["jobs-done"]);

            sleep(Duration::from_secs(120)).await;
            assert_eq!(notifier.played(), vec!["jobs-done"]);
            stop_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(monitor.run(&mut rx, stopped_by(stop_rx)), driver);
        assert!(result.is_ok());
        assert_eq!(monitor.tracker().state(), TrackerState::Alerted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_after_alert_fires_again() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(5, &notifier);
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();

        let driver = async {
            sleep(Duration::from_secs(7)).await;
            assert_eq!(notifier.played().len(), 1);

            tx.send(change("/project/README.md")).await.unwrap();
            sleep(Duration::from_secs(3)).await;
            assert_eq!(notifier.played().len(), 1);

            sleep(Duration::from_secs(4)).await;
            assert_eq!(notifier.played().len(), 2);
            stop_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(monitor.run(&mut rx, stopped_by(stop_rx)), driver);
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_failure_is_not_fatal_or_retried() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let mut monitor = monitor(5, &notifier);
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();

        let driver = async {
            sleep(Duration::from_secs(30)).await;
            assert_eq!(notifier.played().len(), 1);

            tx.send(change("/project/src/lib.rs")).await.unwrap();
            sleep(Duration::from_secs(10)).await;
            assert_eq!(notifier.played().len(), 2);
            stop_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(monitor.run(&mut rx, stopped_by(stop_rx)), driver);
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_watch_error_ends_session() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(60, &notifier);
        let (tx, mut rx) = mpsc::channel(16);

        tx.send(Err(WatchError::Io(std::io::Error::other("watch limit"))))
            .await
            .unwrap();

        let result = monitor.run(&mut rx, std::future::pending()).await;
        assert!(matches!(result, Err(WatchError::Io(_))));
        assert!(notifier.played().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recoverable_watch_error_is_skipped() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(60, &notifier);
        let (tx, mut rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();

        tx.send(Err(WatchError::non_utf8_path("bad"))).await.unwrap();
        tx.send(change("/project/src/app.js")).await.unwrap();

        let driver = async {
            sleep(Duration::from_secs(2)).await;
            stop_tx.send(()).unwrap();
        };

        let (result, ()) = tokio::join!(monitor.run(&mut rx, stopped_by(stop_rx)), driver);
        assert!(result.is_ok());
        assert_eq!(monitor.tracker().state(), TrackerState::QuietPending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_is_fatal() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(60, &notifier);
        let (tx, mut rx) = mpsc::channel::<WatchResult>(1);
        drop(tx);

        let result = monitor.run(&mut rx, std::future::pending()).await;
        assert!(matches!(result, Err(WatchError::ChannelClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_signal_ends_session() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut monitor = monitor(60, &notifier);
        let (_tx, mut rx) = mpsc::channel::<WatchResult>(1);

        let result = monitor.run(&mut rx, std::future::ready(())).await;
        assert!(result.is_ok());
        assert!(notifier.played().is_empty());
    }

    #[test]
    fn test_settle_prefers_watcher_setup_error() {
        let setup = WatchError::from(notify::Error::generic("inotify watch limit reached"));
        let result = settle(Err(WatchError::ChannelClosed), Err(setup));
        assert!(matches!(result, Err(WatchError::Notify(_))));
    }

    #[test]
    fn test_settle_keeps_session_error() {
        let result = settle(
            Err(WatchError::Io(std::io::Error::other("read failed"))),
            Err(WatchError::ChannelClosed),
        );
        assert!(matches!(result, Err(WatchError::Io(_))));

        let result = settle(Err(WatchError::ChannelClosed), Ok(()));
        assert!(matches!(result, Err(WatchError::ChannelClosed)));
    }

    #[test]
    fn test_settle_clean_stop() {
        assert!(settle(Ok(()), Ok(())).is_ok());
        assert!(settle(Ok(()), Err(WatchError::ChannelClosed)).is_ok());
    }
}
