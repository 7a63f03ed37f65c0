//! Study Timer - A study-session timer server with daily progress tracking
//!
//! This is the main entry point for the study-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use study_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::daily_rollover_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, daily target={}min, session target={}min, inactivity timeout={}s",
          config.host, config.port, config.daily_target, config.session_target(), config.inactivity_timeout);

    let session_config = config.session_config().map_err(anyhow::Error::msg)?;

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        session_config,
        config.daily_target,
    ));

    // Start the daily rollover background task
    let rollover_state = Arc::clone(&state);
    let rollover = tokio::spawn(async move {
        daily_rollover_task(rollover_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /session/start - Start a study session");
    info!("  POST /session/pause - Pause or resume the session");
    info!("  POST /session/stop  - Stop the session and record it");
    info!("  GET  /session       - Current session");
    info!("  GET  /status        - Session, daily progress and server status");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    rollover.abort();
    state.timer.shutdown();

    info!("Server shutdown complete");
    Ok(())
}
