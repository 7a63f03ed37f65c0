//! Session timer controller
//!
//! Wraps a [`Session`] behind a lock, drives it with a cancellable ticker task
//! and reports completed sessions through the caller's callback.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    state::{Session, SessionConfig, SessionSnapshot, SessionStatus},
    tasks::{session_ticker_task, TickerContext},
};

/// Receives the whole minutes studied when a session ends with recorded time
pub type CompletionCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Current instant on the runtime clock. Follows tokio's virtual clock when
/// time is paused, so tests drive the inactivity check and the ticker together.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Invoke the completion callback, if any
pub(crate) fn notify_completion(on_complete: Option<&CompletionCallback>, minutes: u64) {
    info!("Study session complete: {} minutes", minutes);
    if let Some(callback) = on_complete {
        callback(minutes);
    }
}

/// Outcome of a user action on the timer
#[derive(Debug, Clone)]
pub struct Transition {
    /// False when the action was ignored in the current state
    pub applied: bool,
    pub snapshot: SessionSnapshot,
    /// Minutes reported to the completion callback, if the action ended a session
    pub completed_minutes: Option<u64>,
}

/// Timer for one study session at a time, reusable across sessions
pub struct SessionTimer {
    session: Arc<Mutex<Session>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
    on_complete: Option<CompletionCallback>,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionTimer {
    /// Create an idle timer
    pub fn new(config: SessionConfig, on_complete: Option<CompletionCallback>) -> Self {
        let session = Session::new(config);
        let (snapshot_tx, _) = watch::channel(session.snapshot(now()));

        Self {
            session: Arc::new(Mutex::new(session)),
            ticker: Mutex::new(None),
            tick_interval: Duration::from_secs(1),
            on_complete,
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    /// Begin a session. Ignored unless the timer is idle.
    pub fn start(&self) -> Result<Transition, String> {
        let runtime = current_runtime()?;
        let mut session = self.lock_session()?;
        let now = now();

        if !session.start(now) {
            debug!("Start ignored, session is {}", session.status());
            return Ok(self.ignored(&session, now));
        }

        info!("Study session started, target {} minutes", session.target_minutes());
        self.spawn_ticker(&runtime, session.epoch());
        Ok(self.applied(&session, now, None))
    }

    /// Pause a running session or resume a paused one. Ignored when idle.
    pub fn toggle_pause(&self) -> Result<Transition, String> {
        let runtime = current_runtime()?;
        let mut session = self.lock_session()?;
        let now = now();

        match session.toggle_pause(now) {
            Some(SessionStatus::Paused) => {
                self.cancel_ticker();
                info!("Study session paused at {}", session.format_elapsed());
            }
            Some(SessionStatus::Running) => {
                self.spawn_ticker(&runtime, session.epoch());
                info!("Study session resumed at {}", session.format_elapsed());
            }
            _ => {
                debug!("Pause ignored, no active session");
                return Ok(self.ignored(&session, now));
            }
        }

        Ok(self.applied(&session, now, None))
    }

    /// End the session, report its length and reset to idle
    pub fn stop(&self) -> Result<Transition, String> {
        let mut session = self.lock_session()?;
        let now = now();
        let was_active = session.status() != SessionStatus::Idle;

        let completed = session.stop();
        self.cancel_ticker();

        let transition = if was_active {
            info!("Study session stopped");
            self.applied(&session, now, completed)
        } else {
            debug!("Stop ignored, no active session");
            self.ignored(&session, now)
        };
        drop(session);

        if let Some(minutes) = completed {
            notify_completion(self.on_complete.as_ref(), minutes);
        } else if was_active {
            debug!("Session stopped with no recorded time, nothing to report");
        }

        Ok(transition)
    }

    /// Current view of the session
    pub fn snapshot(&self) -> Result<SessionSnapshot, String> {
        let session = self.lock_session()?;
        Ok(session.snapshot(now()))
    }

    /// Receive a snapshot after every transition and tick
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Tear the timer down: cancel the ticker and discard any session in
    /// progress without reporting it
    pub fn shutdown(&self) {
        self.cancel_ticker();

        match self.session.lock() {
            Ok(mut session) => {
                if session.status() != SessionStatus::Idle {
                    info!(
                        "Discarding {} session at {} on shutdown",
                        session.status(),
                        session.format_elapsed()
                    );
                    session.stop();
                    self.snapshot_tx.send_replace(session.snapshot(now()));
                }
            }
            Err(e) => warn!("Failed to lock session state during shutdown: {}", e),
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Session>, String> {
        self.session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))
    }

    /// Spawn a ticker for the running stretch identified by `epoch`,
    /// replacing any previous one
    fn spawn_ticker(&self, runtime: &Handle, epoch: u64) {
        let context = TickerContext {
            session: Arc::clone(&self.session),
            epoch,
            period: self.tick_interval,
            snapshot_tx: Arc::clone(&self.snapshot_tx),
            on_complete: self.on_complete.clone(),
        };
        let handle = runtime.spawn(session_ticker_task(context));

        match self.ticker.lock() {
            Ok(mut ticker) => {
                if let Some(previous) = ticker.replace(handle) {
                    previous.abort();
                }
            }
            Err(e) => {
                warn!("Failed to lock ticker handle, ticker will stop on its own: {}", e);
            }
        }
    }

    fn cancel_ticker(&self) {
        match self.ticker.lock() {
            Ok(mut ticker) => {
                if let Some(handle) = ticker.take() {
                    handle.abort();
                    debug!("Session ticker cancelled");
                }
            }
            Err(e) => warn!("Failed to lock ticker handle: {}", e),
        }
    }

    fn applied(&self, session: &Session, now: Instant, completed: Option<u64>) -> Transition {
        let snapshot = session.snapshot(now);
        self.snapshot_tx.send_replace(snapshot.clone());
        Transition {
            applied: true,
            snapshot,
            completed_minutes: completed,
        }
    }

    fn ignored(&self, session: &Session, now: Instant) -> Transition {
        Transition {
            applied: false,
            snapshot: session.snapshot(now),
            completed_minutes: None,
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("session", &self.session)
            .field("tick_interval", &self.tick_interval)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

fn current_runtime() -> Result<Handle, String> {
    Handle::try_current().map_err(|e| format!("Session timer needs a tokio runtime: {}", e))
}
