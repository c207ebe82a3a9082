//! Host badge primitive

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// What the host indicator currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub color: Option<String>,
}

/// A host-visible indicator that can show a short text label
pub trait BadgeIndicator: Send + Sync {
    fn write(&self, text: &str, color: Option<&str>);
    fn read(&self) -> String;
}

/// Badge published through a watch channel
///
/// The HTTP layer and anything else interested subscribe to the receiver
/// side and always observe the latest label.
#[derive(Debug)]
pub struct WatchBadge {
    tx: watch::Sender<Badge>,
}

impl WatchBadge {
    pub fn new() -> (Self, watch::Receiver<Badge>) {
        let (tx, rx) = watch::channel(Badge::default());
        (Self { tx }, rx)
    }
}

impl BadgeIndicator for WatchBadge {
    fn write(&self, text: &str, color: Option<&str>) {
        // send_replace keeps working with no live receivers
        self.tx.send_replace(Badge {
            text: text.to_string(),
            color: color.map(str::to_string),
        });
    }

    fn read(&self) -> String {
        self.tx.borrow().text.clone()
    }
}
