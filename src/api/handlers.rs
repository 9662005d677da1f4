//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppError, AppState, TimerSnapshot};
use super::responses::{ApiResponse, HealthResponse, SetRequest, StatusResponse};

/// Result of an action endpoint; errors still carry a JSON body
pub type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Turn the outcome of a timer action into an HTTP response
fn respond(state: &AppState, action: &str, result: Result<TimerSnapshot, AppError>) -> ApiResult {
    match result {
        Ok(timer) => {
            info!("{} endpoint called - timer {:?} at {}", action, timer.phase, timer.display);
            Ok(Json(ApiResponse::ok(
                format!("Timer {}", timer_message(action)),
                timer,
            )))
        }
        Err(e) if e.is_user_error() => {
            warn!("Rejected {} request: {}", action, e);
            let timer = state.snapshot().unwrap_or_default();
            Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string(), timer))))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string(), TimerSnapshot::default())),
            ))
        }
    }
}

fn timer_message(action: &str) -> &'static str {
    match action {
        "set" => "duration set",
        "start" => "started",
        "pause" => "paused",
        "toggle" => "toggled",
        "reset" => "reset",
        "suspend" => "saved for suspension",
        "resume" => "restored",
        _ => "updated",
    }
}

/// Handle POST /timer/set - Parse the minutes field and set the duration
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetRequest>,
) -> ApiResult {
    let result = state.set_duration_from_input(&request.minutes);
    respond(&state, "set", result)
}

/// Handle POST /timer/toggle - Start when stopped, pause when running
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.toggle();
    respond(&state, "toggle", result)
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.start();
    respond(&state, "start", result)
}

/// Handle POST /timer/pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.pause();
    respond(&state, "pause", result)
}

/// Handle POST /timer/reset - Refill the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.reset();
    respond(&state, "reset", result)
}

/// Handle POST /lifecycle/suspend - Persist the countdown before the host suspends
pub async fn suspend_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.on_suspend();
    respond(&state, "suspend", result)
}

/// Handle POST /lifecycle/resume - Reload and reconcile the countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.on_resume();
    respond(&state, "resume", result)
}

/// Handle GET /timer - Return the live countdown
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        ticking: state.is_ticking(),
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
