//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, SessionSnapshot};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /session/start - Begin a study session
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start_session() {
        Ok(transition) => {
            let message = if transition.applied {
                info!("Start endpoint called - session started");
                "Study session started"
            } else {
                "Session already active, start ignored"
            };
            Ok(Json(ApiResponse::from_transition(message.to_string(), transition)))
        }
        Err(e) => {
            error!("Failed to start session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /session/pause - Pause or resume the session
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle_pause() {
        Ok(transition) => {
            let message = if !transition.applied {
                "No active session, pause ignored".to_string()
            } else {
                info!("Pause endpoint called - session {}", transition.snapshot.status);
                format!("Study session {}", transition.snapshot.status)
            };
            Ok(Json(ApiResponse::from_transition(message, transition)))
        }
        Err(e) => {
            error!("Failed to toggle pause: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /session/stop - End the session and report it
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop_session() {
        Ok(transition) => {
            let message = match (transition.applied, transition.completed_minutes) {
                (false, _) => "No active session, stop ignored".to_string(),
                (true, Some(minutes)) => format!("You studied for {} minutes!", minutes),
                (true, None) => "Study session stopped with no recorded time".to_string(),
            };
            info!("Stop endpoint called - {}", message);
            Ok(Json(ApiResponse::from_transition(message, transition)))
        }
        Err(e) => {
            error!("Failed to stop session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /session - Return the current session
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>, StatusCode> {
    state.timer.snapshot().map(Json).map_err(|e| {
        error!("Failed to get session state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Return session, daily progress and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let session = match state.timer.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get session state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let dashboard = match state.get_dashboard() {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to get dashboard state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        session,
        goal_progress: dashboard.goal_progress(),
        goal_achieved: dashboard.goal_achieved(),
        dashboard,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
