//! Timer categories

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of countdown being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerCategory {
    /// A focus interval (a "tomato")
    #[serde(alias = "tomato")]
    Primary,
    #[serde(alias = "short-break")]
    ShortRest,
    #[serde(alias = "long-break")]
    LongRest,
}

impl TimerCategory {
    pub const ALL: [TimerCategory; 3] = [
        TimerCategory::Primary,
        TimerCategory::ShortRest,
        TimerCategory::LongRest,
    ];

    /// Badge background color used while this category is running
    pub fn badge_color(&self) -> &'static str {
        match self {
            TimerCategory::Primary => "#dc3545",
            TimerCategory::ShortRest => "#28a745",
            TimerCategory::LongRest => "#007bff",
        }
    }

    /// Minutes used when the user configured nothing for this category
    pub fn default_minutes(&self) -> u32 {
        match self {
            TimerCategory::Primary => 25,
            TimerCategory::ShortRest => 5,
            TimerCategory::LongRest => 15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerCategory::Primary => "primary",
            TimerCategory::ShortRest => "short-rest",
            TimerCategory::LongRest => "long-rest",
        }
    }
}

impl fmt::Display for TimerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
