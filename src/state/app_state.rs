//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{DashboardState, SessionConfig, SessionStatus};
use crate::timer::{CompletionCallback, SessionTimer, Transition};

/// Main application state: the dashboard's daily progress and the session
/// timer reporting into it
#[derive(Debug)]
pub struct AppState {
    /// Session timer, reports completed sessions to the dashboard
    pub timer: SessionTimer,
    /// Daily progress, only ever written by the completion callback and rollover
    pub dashboard: Arc<Mutex<DashboardState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for dashboard updates
    pub dashboard_tx: Arc<watch::Sender<DashboardState>>,
}

impl AppState {
    /// Create the application state with an idle timer and an empty dashboard
    pub fn new(port: u16, host: String, session: SessionConfig, daily_target_minutes: u32) -> Self {
        Self::with_dashboard(port, host, session, DashboardState::new(daily_target_minutes))
    }

    /// Create the application state around an existing dashboard
    pub fn with_dashboard(
        port: u16,
        host: String,
        session: SessionConfig,
        dashboard: DashboardState,
    ) -> Self {
        let (dashboard_tx, _) = watch::channel(dashboard.clone());
        let dashboard = Arc::new(Mutex::new(dashboard));
        let dashboard_tx = Arc::new(dashboard_tx);

        let on_complete = session_recorder(Arc::clone(&dashboard), Arc::clone(&dashboard_tx));

        Self {
            timer: SessionTimer::new(session, Some(on_complete)),
            dashboard,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            dashboard_tx,
        }
    }

    /// Start a study session
    pub fn start_session(&self) -> Result<Transition, String> {
        let transition = self.timer.start()?;
        self.record_action("start", &transition);
        Ok(transition)
    }

    /// Pause or resume the current session
    pub fn toggle_pause(&self) -> Result<Transition, String> {
        let transition = self.timer.toggle_pause()?;
        let action = match transition.snapshot.status {
            SessionStatus::Running => "resume",
            _ => "pause",
        };
        self.record_action(action, &transition);
        Ok(transition)
    }

    /// Stop the current session
    pub fn stop_session(&self) -> Result<Transition, String> {
        let transition = self.timer.stop()?;
        self.record_action("stop", &transition);
        Ok(transition)
    }

    /// Get current dashboard state
    pub fn get_dashboard(&self) -> Result<DashboardState, String> {
        self.dashboard
            .lock()
            .map(|dashboard| dashboard.clone())
            .map_err(|e| format!("Failed to lock dashboard state: {}", e))
    }

    /// Reset daily progress if `day` is a new day. Returns true on rollover.
    pub fn roll_over_to(&self, day: NaiveDate) -> Result<bool, String> {
        let mut dashboard = self.dashboard
            .lock()
            .map_err(|e| format!("Failed to lock dashboard state: {}", e))?;

        if !dashboard.roll_over(day) {
            return Ok(false);
        }
        self.dashboard_tx.send_replace(dashboard.clone());
        Ok(true)
    }

    /// Receive the dashboard after every change
    pub fn subscribe_dashboard(&self) -> watch::Receiver<DashboardState> {
        self.dashboard_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Remember the last user action that changed the session
    fn record_action(&self, action: &str, transition: &Transition) {
        if !transition.applied {
            return;
        }
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}

/// Completion callback that adds each finished session to the dashboard
fn session_recorder(
    dashboard: Arc<Mutex<DashboardState>>,
    dashboard_tx: Arc<watch::Sender<DashboardState>>,
) -> CompletionCallback {
    Arc::new(move |minutes: u64| {
        let mut dashboard = match dashboard.lock() {
            Ok(dashboard) => dashboard,
            Err(e) => {
                warn!("Failed to record {} minute session: {}", minutes, e);
                return;
            }
        };

        dashboard.record_session_on(Local::now().date_naive(), minutes);
        info!(
            "You studied for {} minutes! Today: {} / {} minutes",
            minutes, dashboard.today_minutes, dashboard.daily_target_minutes
        );
        if dashboard.goal_achieved() {
            info!("Daily goal achieved");
        }
        dashboard_tx.send_replace(dashboard.clone());
    })
}
