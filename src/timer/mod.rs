//! Session timer module
//!
//! The timer owns the running session and its ticker; the dashboard only sees
//! it through the completion callback.

pub mod controller;

pub use controller::{now, CompletionCallback, SessionTimer, Transition};
