//! Session timer driven by tokio's virtual clock

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use study_timer::{CompletionCallback, SessionConfig, SessionStatus, SessionTimer};
use tokio::time::sleep;

/// Callback that records every reported duration
fn recorder() -> (CompletionCallback, Arc<Mutex<Vec<u64>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let callback: CompletionCallback = Arc::new(move |minutes: u64| {
        seen.lock().unwrap().push(minutes);
    });
    (callback, calls)
}

fn timer(target: u32) -> (SessionTimer, Arc<Mutex<Vec<u64>>>) {
    let (callback, calls) = recorder();
    let timer = SessionTimer::new(SessionConfig::new(target).unwrap(), Some(callback));
    (timer, calls)
}

fn elapsed(timer: &SessionTimer) -> u64 {
    timer.snapshot().unwrap().elapsed_seconds
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_second_while_running() {
    let (timer, _) = timer(45);
    timer.start().unwrap();

    sleep(Duration::from_millis(10_500)).await;
    assert_eq!(elapsed(&timer), 10);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(elapsed(&timer), 15);
    assert_eq!(timer.snapshot().unwrap().status, SessionStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_and_resume_continues() {
    let (timer, _) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(5_500)).await;

    let paused = timer.toggle_pause().unwrap();
    assert!(paused.applied);
    assert_eq!(paused.snapshot.status, SessionStatus::Paused);

    // Paused longer than the inactivity timeout: no accrual, no auto-stop
    sleep(Duration::from_secs(300)).await;
    assert_eq!(elapsed(&timer), 5);
    assert_eq!(timer.snapshot().unwrap().status, SessionStatus::Paused);

    let resumed = timer.toggle_pause().unwrap();
    assert_eq!(resumed.snapshot.status, SessionStatus::Running);
    sleep(Duration::from_millis(3_200)).await;
    assert_eq!(elapsed(&timer), 8);
}

#[tokio::test(start_paused = true)]
async fn start_while_active_is_ignored() {
    let (timer, _) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(4_500)).await;

    let again = timer.start().unwrap();
    assert!(!again.applied);
    assert_eq!(again.snapshot.elapsed_seconds, 4);

    // A second start must not add a second ticker
    sleep(Duration::from_secs(2)).await;
    assert_eq!(elapsed(&timer), 6);
}

#[tokio::test(start_paused = true)]
async fn stop_reports_truncated_minutes_once() {
    let (timer, calls) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(119_500)).await;

    let stopped = timer.stop().unwrap();
    assert_eq!(stopped.completed_minutes, Some(1));
    assert_eq!(stopped.snapshot.status, SessionStatus::Idle);
    assert_eq!(stopped.snapshot.elapsed_seconds, 0);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(elapsed(&timer), 0);
    assert_eq!(*calls.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn inactivity_auto_stops_once() {
    let (timer, calls) = timer(45);
    let mut rx = timer.subscribe();
    timer.start().unwrap();

    // Ticks at 1..=120 accrue; the tick at 121 s finds 121 s without activity
    sleep(Duration::from_millis(121_500)).await;

    let snapshot = timer.snapshot().unwrap();
    assert_eq!(snapshot.status, SessionStatus::Idle);
    assert_eq!(snapshot.elapsed_seconds, 0);
    assert_eq!(*calls.lock().unwrap(), vec![2]);
    assert_eq!(rx.borrow_and_update().status, SessionStatus::Idle);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(*calls.lock().unwrap(), vec![2]);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn resume_refreshes_inactivity_window() {
    let (timer, calls) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(100_500)).await;

    timer.toggle_pause().unwrap();
    timer.toggle_pause().unwrap();

    // 100 s in; without the resume the session would stop at 121 s
    sleep(Duration::from_millis(60_200)).await;
    assert_eq!(timer.snapshot().unwrap().status, SessionStatus::Running);
    assert_eq!(elapsed(&timer), 160);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn new_session_starts_from_zero() {
    let (timer, calls) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(61_500)).await;
    timer.stop().unwrap();

    timer.start().unwrap();
    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(elapsed(&timer), 2);

    timer.stop().unwrap();
    assert_eq!(*calls.lock().unwrap(), vec![1, 0]);
}

#[tokio::test(start_paused = true)]
async fn dropping_timer_cancels_ticker() {
    let (timer, calls) = timer(45);
    timer.start().unwrap();
    sleep(Duration::from_millis(2_500)).await;

    let mut rx = timer.subscribe();
    drop(timer);

    // Every sender lives in the timer or its ticker, so the stream closes
    // only once the ticker is gone
    assert!(rx.changed().await.is_err());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn progress_tracks_target() {
    let (timer, _) = timer(2);
    timer.start().unwrap();
    sleep(Duration::from_millis(60_500)).await;

    let snapshot = timer.snapshot().unwrap();
    assert!((snapshot.progress - 0.5).abs() < f64::EPSILON);
    assert_eq!(snapshot.progress_percent, 50);
    assert_eq!(snapshot.elapsed, "01:00");
    timer.stop().unwrap();
}

#[tokio::test(start_paused = true)]
async fn subscribers_follow_pause_and_resume() {
    let (timer, _) = timer(45);
    let rx = timer.subscribe();
    timer.start().unwrap();
    sleep(Duration::from_millis(3_500)).await;

    timer.toggle_pause().unwrap();
    sleep(Duration::from_secs(10)).await;
    assert_eq!(*rx.borrow(), timer.snapshot().unwrap());
    assert_eq!(rx.borrow().status, SessionStatus::Paused);

    timer.toggle_pause().unwrap();
    sleep(Duration::from_millis(2_500)).await;
    let latest = rx.borrow().clone();
    assert_eq!(latest.status, SessionStatus::Running);
    assert_eq!(latest.elapsed_seconds, elapsed(&timer));
    assert_eq!(latest.elapsed_seconds, 5);
}
