//! Study Timer - A study-session timer with daily progress tracking
//!
//! This library provides a session timer with pause/resume, inactivity
//! auto-stop and a completion callback, plus the dashboard state and HTTP
//! surface that drive it.

pub mod config;
pub mod state;
pub mod timer;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, DashboardState, Session, SessionConfig, SessionSnapshot, SessionStatus};
pub use timer::{CompletionCallback, SessionTimer};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
