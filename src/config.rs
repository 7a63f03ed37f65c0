//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::SessionConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "study-timer")]
#[command(about = "A study-session timer server with daily progress tracking")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Daily study goal in minutes
    #[arg(short, long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..))]
    pub daily_target: u32,

    /// Target length of a single session in minutes (defaults to the daily goal)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub session_target: Option<u32>,

    /// Seconds without pause/resume before a running session auto-stops
    #[arg(long, default_value = "120", value_parser = clap::value_parser!(u64).range(1..))]
    pub inactivity_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Session target in minutes
    pub fn session_target(&self) -> u32 {
        self.session_target.unwrap_or(self.daily_target)
    }

    /// Build the session timer configuration
    pub fn session_config(&self) -> Result<SessionConfig, String> {
        Ok(SessionConfig::new(self.session_target())?
            .with_inactivity_timeout(Duration::from_secs(self.inactivity_timeout)))
    }
}
