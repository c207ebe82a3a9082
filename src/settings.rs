//! User timer settings and the provider the controller reads them through
//!
//! Settings are re-read on every resolution so edits to the settings file
//! apply to the next timer without restarting the daemon.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::timer::TimerCategory;

/// User-facing timer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_minutes_in_primary")]
    pub minutes_in_primary: u32,
    #[serde(default = "default_minutes_in_short_rest")]
    pub minutes_in_short_rest: u32,
    #[serde(default = "default_minutes_in_long_rest")]
    pub minutes_in_long_rest: u32,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true")]
    pub notification_sound_enabled: bool,
    #[serde(default = "default_notification_sound")]
    pub notification_sound: String,
}

fn default_minutes_in_primary() -> u32 {
    TimerCategory::Primary.default_minutes()
}
fn default_minutes_in_short_rest() -> u32 {
    TimerCategory::ShortRest.default_minutes()
}
fn default_minutes_in_long_rest() -> u32 {
    TimerCategory::LongRest.default_minutes()
}
fn default_true() -> bool {
    true
}
fn default_notification_sound() -> String {
    "timer-chime.mp3".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            minutes_in_primary: default_minutes_in_primary(),
            minutes_in_short_rest: default_minutes_in_short_rest(),
            minutes_in_long_rest: default_minutes_in_long_rest(),
            notifications_enabled: true,
            notification_sound_enabled: true,
            notification_sound: default_notification_sound(),
        }
    }
}

impl Settings {
    /// Configured minutes for a category, as written by the user
    pub fn minutes_for(&self, category: TimerCategory) -> u32 {
        match category {
            TimerCategory::Primary => self.minutes_in_primary,
            TimerCategory::ShortRest => self.minutes_in_short_rest,
            TimerCategory::LongRest => self.minutes_in_long_rest,
        }
    }
}

/// Read-only access to the current settings
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> Settings;
}

impl SettingsProvider for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

/// Settings stored as a JSON document on disk
///
/// Missing fields take their defaults; a missing or unreadable file yields
/// the full default settings.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsProvider for JsonSettingsFile {
    fn settings(&self) -> Settings {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", self.path.display());
                return Settings::default();
            }
            Err(e) => {
                warn!("Failed to read settings {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings {}: {}", self.path.display(), e);
            Settings::default()
        })
    }
}
