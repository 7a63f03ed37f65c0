//! State management module
//!
//! This module contains the session state machine, the dashboard's daily
//! progress and the shared application state that ties them together.

pub mod session_state;
pub mod dashboard_state;
pub mod app_state;

// Re-export main types
pub use session_state::{Session, SessionConfig, SessionSnapshot, SessionStatus, TickOutcome};
pub use dashboard_state::DashboardState;
pub use app_state::AppState;
