//! Shared state for the HTTP layer

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::{
    badge::Badge,
    completion::TimelineLog,
    controller::TimerHandle,
};

/// Everything request handlers need; the timer itself lives in the event loop
#[derive(Clone)]
pub struct AppState {
    /// Command channel into the timer event loop
    pub timer: TimerHandle,
    /// Latest badge as published by the controller
    pub badge: watch::Receiver<Badge>,
    pub timeline: Arc<TimelineLog>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<(String, DateTime<Utc>)>>>,
}

impl AppState {
    pub fn new(
        timer: TimerHandle,
        badge: watch::Receiver<Badge>,
        timeline: Arc<TimelineLog>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            timer,
            badge,
            timeline,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
        }
    }

    /// Remember the last command issued through the API
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last) = self.last_action.lock() {
            *last = Some((action.to_string(), Utc::now()));
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|last| last.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    pub fn current_badge(&self) -> Badge {
        self.badge.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
