//! Daily rollover background task

use std::{sync::Arc, time::Duration};
use chrono::Local;
use tokio::time::interval;
use tracing::{info, warn};

use crate::state::AppState;

/// How often the calendar date is checked
pub const ROLLOVER_CHECK_INTERVAL: Duration = Duration::from_secs(15);

/// Background task that resets daily progress when the local date changes
pub async fn daily_rollover_task(state: Arc<AppState>) {
    info!("Starting daily rollover task");

    let mut interval = interval(ROLLOVER_CHECK_INTERVAL);

    loop {
        interval.tick().await;

        let today = Local::now().date_naive();
        if let Err(e) = state.roll_over_to(today) {
            warn!("Failed to check daily rollover: {}", e);
        }
    }
}
