//! HTTP API module
//!
//! The command surface of the timer: start, reset and scheduled-completion
//! queries, plus read-only status endpoints.

pub mod handlers;
pub mod responses;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/timer/:category/start", post(start_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/scheduled", get(scheduled_handler))
        .route("/badge", get(badge_handler))
        .route("/status", get(status_handler))
        .route("/timeline", get(timeline_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
