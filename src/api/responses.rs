//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    badge::Badge,
    state::TimerState,
};

/// API response structure for timer commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a running response
    pub fn running(message: String, timer: TimerState) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Create an idle response
    pub fn idle(message: String) -> Self {
        Self::new("idle".to_string(), message, TimerState::idle())
    }
}

/// Scheduled completion of the active timer, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledResponse {
    pub scheduled_completion_ms: Option<i64>,
    pub scheduled_completion: Option<DateTime<Utc>>,
}

impl ScheduledResponse {
    pub fn new(scheduled_completion_ms: Option<i64>) -> Self {
        Self {
            scheduled_completion_ms,
            scheduled_completion: scheduled_completion_ms.and_then(DateTime::<Utc>::from_timestamp_millis),
        }
    }
}

/// Status response with timer and badge information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub remaining_ms: Option<i64>,
    pub badge: Badge,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
