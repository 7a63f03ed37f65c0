//! Session ticker background task

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::watch,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

use crate::{
    state::{Session, SessionSnapshot, TickOutcome},
    timer::{controller::notify_completion, CompletionCallback},
};

/// Everything a ticker needs from the timer that spawned it
pub struct TickerContext {
    pub session: Arc<Mutex<Session>>,
    /// Running stretch this ticker belongs to
    pub epoch: u64,
    pub period: Duration,
    pub snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
    pub on_complete: Option<CompletionCallback>,
}

/// Tick the session once per period while it stays in the running stretch
/// identified by `epoch`. Returns as soon as the session leaves it, either
/// through a user action or the inactivity auto-stop.
pub async fn session_ticker_task(ctx: TickerContext) {
    debug!("Starting session ticker (epoch {})", ctx.epoch);

    // First tick one full period after the session starts or resumes
    let mut interval = interval_at(Instant::now() + ctx.period, ctx.period);

    loop {
        interval.tick().await;
        let now = Instant::now().into_std();

        // Snapshots are published under the session lock, same as user actions
        let outcome = {
            let mut session = match ctx.session.lock() {
                Ok(session) => session,
                Err(e) => {
                    error!("Failed to lock session state, stopping ticker: {}", e);
                    break;
                }
            };

            if session.epoch() != ctx.epoch {
                debug!("Ticker epoch {} superseded by {}", ctx.epoch, session.epoch());
                break;
            }

            let outcome = session.tick(now);
            if outcome != TickOutcome::Ignored {
                ctx.snapshot_tx.send_replace(session.snapshot(now));
            }
            outcome
        };

        match outcome {
            TickOutcome::Advanced(elapsed) => {
                if elapsed % 60 == 0 {
                    debug!("Session running for {} minutes", elapsed / 60);
                }
            }
            TickOutcome::TimedOut(completed) => {
                info!("No activity for too long, auto-stopping study session");
                if let Some(minutes) = completed {
                    notify_completion(ctx.on_complete.as_ref(), minutes);
                }
                break;
            }
            TickOutcome::Ignored => {
                debug!("Session no longer running, ticker exiting");
                break;
            }
        }
    }
}
