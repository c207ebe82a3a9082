//! Completion notifications
//!
//! Presentation is left to subscribers of the broadcast channel; this sink
//! only decides what to say.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{CompletionEvent, CompletionSink};
use crate::{error::SinkError, settings::SettingsProvider, timer::TimerCategory};

pub const NOTIFICATION_TITLE: &str = "Tomato Clock";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub category: TimerCategory,
    pub title: String,
    pub message: String,
    /// Suggested next timers
    pub follow_ups: Vec<TimerCategory>,
    /// Sound to play, if sounds are enabled
    pub sound: Option<String>,
}

fn message_for(category: TimerCategory) -> &'static str {
    match category {
        TimerCategory::Primary => "Your Tomato timer is done!",
        TimerCategory::ShortRest => "Your short break is done!",
        TimerCategory::LongRest => "Your long break is done!",
    }
}

fn follow_ups_for(category: TimerCategory) -> Vec<TimerCategory> {
    match category {
        TimerCategory::Primary => vec![TimerCategory::ShortRest, TimerCategory::LongRest],
        TimerCategory::ShortRest | TimerCategory::LongRest => vec![TimerCategory::Primary],
    }
}

pub struct Notifier {
    settings: Arc<dyn SettingsProvider>,
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { settings, tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Build the notification for `category` under the current settings
    pub fn notification_for(&self, category: TimerCategory) -> Option<Notification> {
        let settings = self.settings.settings();
        if !settings.notifications_enabled {
            return None;
        }

        Some(Notification {
            category,
            title: NOTIFICATION_TITLE.to_string(),
            message: message_for(category).to_string(),
            follow_ups: follow_ups_for(category),
            sound: settings
                .notification_sound_enabled
                .then_some(settings.notification_sound),
        })
    }
}

impl CompletionSink for Notifier {
    fn on_completion(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        let Some(notification) = self.notification_for(event.category) else {
            debug!("Notifications disabled, skipping {} completion", event.category);
            return Ok(());
        };

        info!("{}: {}", notification.title, notification.message);
        if self.tx.send(notification).is_err() {
            debug!("No notification subscribers");
        }
        Ok(())
    }
}
