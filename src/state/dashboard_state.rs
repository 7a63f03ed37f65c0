//! Daily progress state owned by the dashboard

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default daily study goal in minutes
pub const DEFAULT_DAILY_TARGET_MINUTES: u32 = 20;

/// Daily study progress. Sessions report into this through the completion
/// callback; the session timer itself never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Calendar day the counters belong to
    pub day: NaiveDate,
    pub daily_target_minutes: u32,
    /// Minutes studied today across all completed sessions
    pub today_minutes: u64,
    pub sessions_completed: u32,
    pub last_session_minutes: Option<u64>,
}

impl DashboardState {
    /// Create an empty dashboard for today
    pub fn new(daily_target_minutes: u32) -> Self {
        Self::for_day(daily_target_minutes, Local::now().date_naive())
    }

    /// Create an empty dashboard for a specific day
    pub fn for_day(daily_target_minutes: u32, day: NaiveDate) -> Self {
        Self {
            day,
            daily_target_minutes,
            today_minutes: 0,
            sessions_completed: 0,
            last_session_minutes: None,
        }
    }

    /// Add a completed session to today's total
    pub fn record_session(&mut self, minutes: u64) {
        self.today_minutes += minutes;
        self.sessions_completed += 1;
        self.last_session_minutes = Some(minutes);
    }

    /// Add a session finished on `day`, rolling over first if the day changed
    pub fn record_session_on(&mut self, day: NaiveDate, minutes: u64) {
        self.roll_over(day);
        self.record_session(minutes);
    }

    /// Fraction of the daily goal reached, capped at 1.0
    pub fn goal_progress(&self) -> f64 {
        if self.daily_target_minutes == 0 {
            return 1.0;
        }
        (self.today_minutes as f64 / f64::from(self.daily_target_minutes)).min(1.0)
    }

    pub fn goal_achieved(&self) -> bool {
        self.today_minutes >= u64::from(self.daily_target_minutes)
    }

    pub fn remaining_minutes(&self) -> u64 {
        u64::from(self.daily_target_minutes).saturating_sub(self.today_minutes)
    }

    /// Start a new day. Returns true if the day actually changed.
    pub fn roll_over(&mut self, day: NaiveDate) -> bool {
        if day == self.day {
            return false;
        }

        tracing::info!(
            "New day {}, resetting daily progress ({} min in {} sessions on {})",
            day, self.today_minutes, self.sessions_completed, self.day
        );
        *self = Self::for_day(self.daily_target_minutes, day);
        true
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_TARGET_MINUTES)
    }
}
