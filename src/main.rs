//! Clock Timer - a countdown timer that survives pause, resume and suspension
//!
//! This is the main entry point for the clock-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use clock_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{JsonFileStore, SystemClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("clock_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting clock-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, state_file={}, tick={}ms",
          config.host, config.port, config.state_file.display(), config.tick_ms);

    let store = Arc::new(JsonFileStore::new(config.state_file.clone()));
    let state = Arc::new(AppState::new(store, Arc::new(SystemClock), config.tick_interval()));

    // Process start is a resume boundary
    state.on_resume()?;

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer             - Current countdown");
    info!("  POST /timer/set         - Set duration from {{\"minutes\": \"5\"}}");
    info!("  POST /timer/toggle      - Start or pause");
    info!("  POST /timer/start       - Start the countdown");
    info!("  POST /timer/pause       - Pause the countdown");
    info!("  POST /timer/reset       - Reset to the set duration");
    info!("  POST /lifecycle/suspend - Save before the host suspends");
    info!("  POST /lifecycle/resume  - Restore after the host resumes");
    info!("  GET  /health            - Health check");

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

    // Process exit is a suspend boundary
    state.on_suspend()?;

    info!("Server shutdown complete");
    Ok(())
}
