//! HTTP control surface

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use study_timer::{create_router, AppState, DashboardState, SessionConfig};
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_dashboard(
        20554,
        "127.0.0.1".to_string(),
        SessionConfig::new(20).unwrap(),
        DashboardState::for_day(20, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
    ));
    (create_router(Arc::clone(&state)), state)
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = call(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn idle_actions_are_ignored() {
    let (app, _) = app();

    let (status, body) = call(&app, "POST", "/session/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");

    let (_, body) = call(&app, "POST", "/session/stop").await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["completed_minutes"], Value::Null);

    let (_, body) = call(&app, "GET", "/status").await;
    assert_eq!(body["last_action"], Value::Null);
    assert_eq!(body["session"]["status"], "idle");
}

#[tokio::test(start_paused = true)]
async fn full_session_updates_dashboard() {
    let (app, _) = app();

    let (status, body) = call(&app, "POST", "/session/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["session"]["target_minutes"], 20);

    let (_, body) = call(&app, "POST", "/session/start").await;
    assert_eq!(body["status"], "ignored");

    tokio::time::sleep(Duration::from_millis(90_500)).await;

    let (_, body) = call(&app, "POST", "/session/pause").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["session"]["elapsed"], "01:30");

    let (_, body) = call(&app, "GET", "/session").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["inactivity_remaining_seconds"], Value::Null);

    let (_, body) = call(&app, "POST", "/session/pause").await;
    assert_eq!(body["status"], "running");

    let (_, body) = call(&app, "POST", "/session/stop").await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["completed_minutes"], 1);
    assert_eq!(body["message"], "You studied for 1 minutes!");

    let (_, body) = call(&app, "GET", "/status").await;
    assert_eq!(body["dashboard"]["today_minutes"], 1);
    assert_eq!(body["dashboard"]["sessions_completed"], 1);
    assert_eq!(body["goal_achieved"], false);
    assert_eq!(body["last_action"], "stop");
    assert_eq!(body["session"]["elapsed_seconds"], 0);
}
