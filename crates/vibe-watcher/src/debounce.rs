//! Quiet-period detection.
//!
//! [`DebounceTracker`] remembers when the last accepted change happened and
//! reports, exactly once per quiet period, that the configured threshold has
//! elapsed without further activity.
//!
//! # State Machine
//!
//! ```text
//!                 check_completion (elapsed >= threshold)
//!   QuietPending ───────────────────────────────────────► Alerted
//!        ▲                                                   │
//!        └────────────────── record_change ──────────────────┘
//! ```
//!
//! A tracker starts in [`TrackerState::QuietPending`] with the start instant
//! as its last change, so a session with no activity at all still fires once
//! after the threshold. There is no terminal state.
//!
//! The tracker never reads the clock itself; callers pass instants in, which
//! keeps it deterministic under test.

use std::time::{Duration, Instant};

use camino::Utf8Path;

/// Whether the tracker is waiting for silence or has already fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Activity has been seen since the last alert; waiting for the quiet threshold.
    QuietPending,
    /// The alert for the current quiet period has fired.
    Alerted,
}

/// Single-fire quiescence detector for one watch session.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use camino::Utf8Path;
/// use vibe_watcher::DebounceTracker;
///
/// let start = Instant::now();
/// let mut tracker = DebounceTracker::starting_at("jobs-done", Duration::from_secs(60), start);
///
/// tracker.record_change(Utf8Path::new("src/main.rs"), start + Duration::from_secs(20));
/// assert_eq!(tracker.check_completion(start + Duration::from_secs(79)), None);
/// assert_eq!(tracker.check_completion(start + Duration::from_secs(80)), Some("jobs-done"));
/// assert_eq!(tracker.check_completion(start + Duration::from_secs(90)), None);
/// ```
#[derive(Debug, Clone)]
pub struct DebounceTracker {
    sound: String,
    quiet_threshold: Duration,
    last_change: Instant,
    has_alerted: bool,
}

impl DebounceTracker {
    /// Creates a tracker whose quiet period starts now.
    #[must_use]
    pub fn new(sound: impl Into<String>, quiet_threshold: Duration) -> Self {
        Self::starting_at(sound, quiet_threshold, Instant::now())
    }

    /// Creates a tracker whose quiet period starts at `start`.
    #[must_use]
    pub fn starting_at(sound: impl Into<String>, quiet_threshold: Duration, start: Instant) -> Self {
        Self {
            sound: sound.into(),
            quiet_threshold,
            last_change: start,
            has_alerted: false,
        }
    }

    /// Records an accepted change to `path` observed at `at`.
    ///
    /// Restarts the quiet period and re-arms the alert.
    pub fn record_change(&mut self, path: &Utf8Path, at: Instant) {
        tracing::info!(path = %path, "Change detected");
        self.last_change = at;
        self.has_alerted = false;
    }

    /// Returns the sound to play if the quiet threshold has just been crossed.
    ///
    /// Fires at most once per quiet period: after returning `Some`, every
    /// further call returns `None` until [`record_change`](Self::record_change)
    /// re-arms the tracker.
    pub fn check_completion(&mut self, now: Instant) -> Option<&str> {
        if self.has_alerted || self.elapsed(now) < self.quiet_threshold {
            return None;
        }
        self.has_alerted = true;
        Some(&self.sound)
    }

    /// Time since the last change, saturating at zero for earlier instants.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_change)
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> TrackerState {
        if self.has_alerted {
            TrackerState::Alerted
        } else {
            TrackerState::QuietPending
        }
    }

    /// Returns `true` if the alert for the current quiet period has fired.
    #[must_use]
    pub const fn has_alerted(&self) -> bool {
        self.has_alerted
    }

    /// Returns the instant of the last recorded change.
    #[must_use]
    pub const fn last_change(&self) -> Instant {
        self.last_change
    }

    /// Returns the configured quiet threshold.
    #[must_use]
    pub const fn quiet_threshold(&self) -> Duration {
        self.quiet_threshold
    }

    /// Returns the sound identifier fired on completion.
    #[must_use]
    pub fn sound(&self) -> &str {
        &self.sound
    }
}
