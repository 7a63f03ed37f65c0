//! Background tasks module
//!
//! This module contains the session ticker and the tasks that run alongside
//! the HTTP server.

pub mod session_ticker;
pub mod daily_rollover;

// Re-export main functions
pub use session_ticker::{session_ticker_task, TickerContext};
pub use daily_rollover::daily_rollover_task;
