//! Study session state machine
//!
//! `Session` holds the state of one timed study interval. Every operation is
//! total: calls that make no sense in the current status are ignored. Time is
//! passed in by the caller so the ticker and the tests share one code path.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default goal length of a session in minutes
pub const DEFAULT_TARGET_MINUTES: u32 = 45;

/// Default inactivity threshold before a running session auto-stops
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(120);

/// Session lifecycle status. Stopping is not a resting state: a stopped
/// session reports its duration and folds straight back into `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session is not running, nothing changed
    Ignored,
    /// Elapsed time advanced to the contained number of seconds
    Advanced(u64),
    /// Inactivity threshold exceeded; the session was stopped. Carries the
    /// completed minutes when there was anything to report.
    TimedOut(Option<u64>),
}

/// Session configuration supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub target_duration_minutes: u32,
    pub inactivity_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with the given target and the default inactivity timeout
    pub fn new(target_duration_minutes: u32) -> Result<Self, String> {
        if target_duration_minutes == 0 {
            return Err("Target duration must be at least 1 minute".to_string());
        }
        Ok(Self {
            target_duration_minutes,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
        })
    }

    /// Override the inactivity timeout
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_duration_minutes: DEFAULT_TARGET_MINUTES,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
        }
    }
}

/// State of a single study session
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    elapsed_seconds: u64,
    config: SessionConfig,
    last_activity: Option<Instant>,
    /// Bumped whenever the session enters `Running`, so a ticker can tell
    /// whether it still owns the running stretch it was spawned for
    epoch: u64,
}

impl Session {
    /// Create an idle session
    pub fn new(config: SessionConfig) -> Self {
        Self {
            status: SessionStatus::Idle,
            elapsed_seconds: 0,
            config,
            last_activity: None,
            epoch: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn target_minutes(&self) -> u32 {
        self.config.target_duration_minutes
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn last_activity(&self) -> Option<Instant> {
        self.last_activity
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Begin a new session. Returns false (and changes nothing) unless idle.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.status != SessionStatus::Idle {
            return false;
        }

        self.status = SessionStatus::Running;
        self.elapsed_seconds = 0;
        self.last_activity = Some(now);
        self.epoch = self.epoch.wrapping_add(1);
        true
    }

    /// Flip between running and paused. Returns the new status, or `None`
    /// when idle.
    pub fn toggle_pause(&mut self, now: Instant) -> Option<SessionStatus> {
        self.status = match self.status {
            SessionStatus::Running => SessionStatus::Paused,
            SessionStatus::Paused => SessionStatus::Running,
            SessionStatus::Idle => return None,
        };
        if self.status == SessionStatus::Running {
            self.epoch = self.epoch.wrapping_add(1);
        }
        self.last_activity = Some(now);
        Some(self.status)
    }

    /// Stop the session and reset to idle.
    ///
    /// Returns the completed whole minutes when any time was recorded. A
    /// session stopped at zero seconds reports nothing.
    pub fn stop(&mut self) -> Option<u64> {
        let completed = (self.elapsed_seconds > 0).then(|| self.elapsed_seconds / 60);

        self.status = SessionStatus::Idle;
        self.elapsed_seconds = 0;
        self.last_activity = None;
        completed
    }

    /// Advance the clock by one second if running, or auto-stop when the
    /// user has been inactive for longer than the configured timeout.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Ignored;
        }

        if self.inactive_for(now) > self.config.inactivity_timeout {
            return TickOutcome::TimedOut(self.stop());
        }

        self.elapsed_seconds += 1;
        TickOutcome::Advanced(self.elapsed_seconds)
    }

    /// Time since the last user action; zero when no session is active
    pub fn inactive_for(&self, now: Instant) -> Duration {
        self.last_activity
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default()
    }

    /// Seconds left before the inactivity auto-stop, only meaningful while running
    pub fn inactivity_remaining(&self, now: Instant) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        Some(
            self.config
                .inactivity_timeout
                .saturating_sub(self.inactive_for(now))
                .as_secs(),
        )
    }

    /// Fraction of the target reached, capped at 1.0
    pub fn progress_fraction(&self) -> f64 {
        let minutes = self.elapsed_seconds as f64 / 60.0;
        (minutes / f64::from(self.config.target_duration_minutes)).min(1.0)
    }

    /// Whole percent of the target reached. Not capped, so a session past its
    /// target reads above 100.
    pub fn progress_percent(&self) -> u64 {
        let target_seconds = 60 * u64::from(self.config.target_duration_minutes.max(1));
        self.elapsed_seconds * 100 / target_seconds
    }

    /// Elapsed time as MM:SS
    pub fn format_elapsed(&self) -> String {
        format_mmss(self.elapsed_seconds)
    }

    /// Serializable view of the session at `now`
    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            elapsed: self.format_elapsed(),
            target_minutes: self.config.target_duration_minutes,
            progress: self.progress_fraction(),
            progress_percent: self.progress_percent(),
            inactivity_remaining_seconds: self.inactivity_remaining(now),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Point-in-time view of a session for display and the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub elapsed_seconds: u64,
    pub elapsed: String,
    pub target_minutes: u32,
    pub progress: f64,
    pub progress_percent: u64,
    pub inactivity_remaining_seconds: Option<u64>,
}

/// Format seconds as MM:SS
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
