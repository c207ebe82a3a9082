//! Badge label derivation and deduplicated rendering

use std::sync::Arc;
use tracing::debug;

use super::BadgeIndicator;
use crate::timer::MS_PER_MINUTE;

/// Label shown while less than a minute remains
pub const UNDER_ONE_MINUTE: &str = "<1";

/// Badge label for `remaining_ms`, or `None` when the badge should be empty.
///
/// Whole minutes are floored, so 125 000 ms shows "2" and anything between
/// one millisecond and a minute shows the under-a-minute marker.
pub fn label_for_remaining(remaining_ms: i64) -> Option<String> {
    if remaining_ms <= 0 {
        return None;
    }
    let minutes = remaining_ms as u64 / MS_PER_MINUTE;
    let seconds = (remaining_ms as u64 % MS_PER_MINUTE) / 1000;
    if minutes == 0 && seconds < 60 {
        Some(UNDER_ONE_MINUTE.to_string())
    } else {
        Some(minutes.to_string())
    }
}

/// Writes labels to the host badge, skipping writes that change nothing
pub struct BadgeRenderer {
    indicator: Arc<dyn BadgeIndicator>,
}

impl BadgeRenderer {
    pub fn new(indicator: Arc<dyn BadgeIndicator>) -> Self {
        Self { indicator }
    }

    /// Write `text` unless the badge already shows it. Returns whether a write happened.
    pub fn set_label(&self, text: &str, color: Option<&str>) -> bool {
        if self.indicator.read() == text {
            return false;
        }
        debug!("Badge label -> {:?}", text);
        self.indicator.write(text, color);
        true
    }

    pub fn current_label(&self) -> String {
        self.indicator.read()
    }

    pub fn clear(&self) -> bool {
        self.set_label("", None)
    }

    /// Render the label for `remaining_ms`, clearing the badge once time has lapsed
    pub fn render_remaining(&self, remaining_ms: i64, color: &str) -> bool {
        match label_for_remaining(remaining_ms) {
            Some(label) => self.set_label(&label, Some(color)),
            None => self.clear(),
        }
    }
}
