//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{DashboardState, SessionSnapshot},
    timer::Transition,
};

/// API response structure for session control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionSnapshot,
    /// Minutes reported to the dashboard if this action ended a session
    pub completed_minutes: Option<u64>,
}

impl ApiResponse {
    fn new(status: String, message: String, transition: Transition) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session: transition.snapshot,
            completed_minutes: transition.completed_minutes,
        }
    }

    /// Build a response from a timer transition, reporting the session
    /// status when applied and "ignored" otherwise
    pub fn from_transition(message: String, transition: Transition) -> Self {
        let status = if transition.applied {
            transition.snapshot.status.to_string()
        } else {
            "ignored".to_string()
        };
        Self::new(status, message, transition)
    }
}

/// Full status: session, daily progress and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub dashboard: DashboardState,
    pub goal_progress: f64,
    pub goal_achieved: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
