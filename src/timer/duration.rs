//! Duration resolution from settings

use crate::settings::Settings;

use super::TimerCategory;

pub const MS_PER_MINUTE: u64 = 60_000;

/// Length of a timer of `category` in milliseconds.
///
/// A configured value of zero minutes falls back to the category default,
/// so a running timer never has a zero duration.
pub fn resolve_duration_ms(category: TimerCategory, settings: &Settings) -> u64 {
    let minutes = match settings.minutes_for(category) {
        0 => category.default_minutes(),
        m => m,
    };
    u64::from(minutes) * MS_PER_MINUTE
}
