//! HTTP endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    badge::Badge,
    completion::TimelineRecord,
    state::AppState,
    timer::TimerCategory,
};
use super::responses::{ApiResponse, HealthResponse, ScheduledResponse, StatusResponse};

/// Handle POST /timer/:category/start - Start a timer, replacing any running one
pub async fn start_handler(
    State(state): State<AppState>,
    Path(category): Path<TimerCategory>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.timer.start(category).await {
        Ok(timer) => {
            info!("Start endpoint called - {} timer running", category);
            state.record_action(&format!("start-{}", category));
            Ok(Json(ApiResponse::running(
                format!("{} timer started", category),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to start {} timer: {}", category, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/reset - Stop the timer without completing it
pub async fn reset_handler(State(state): State<AppState>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.timer.reset().await {
        Ok(()) => {
            info!("Reset endpoint called - timer idle");
            state.record_action("reset");
            Ok(Json(ApiResponse::idle("Timer reset".to_string())))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /timer/scheduled - When the active timer is due
pub async fn scheduled_handler(State(state): State<AppState>) -> Result<Json<ScheduledResponse>, StatusCode> {
    state
        .timer
        .scheduled_completion()
        .await
        .map(|at| Json(ScheduledResponse::new(at)))
        .map_err(|e| {
            error!("Failed to query scheduled completion: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle GET /badge - Current badge label
pub async fn badge_handler(State(state): State<AppState>) -> Json<Badge> {
    Json(state.current_badge())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.timer.status().await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer status: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: snapshot.state,
        remaining_ms: snapshot.remaining_ms,
        badge: state.current_badge(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /timeline - Completed timers, oldest first
pub async fn timeline_handler(State(state): State<AppState>) -> Result<Json<Vec<TimelineRecord>>, StatusCode> {
    state.timeline.records().map(Json).map_err(|e| {
        error!("Failed to read timeline: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
