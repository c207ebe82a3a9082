//! Badge module
//!
//! A compact label (whole minutes left, or "<1") mirrored to a host
//! indicator.

pub mod indicator;
pub mod renderer;

pub use indicator::{Badge, BadgeIndicator, WatchBadge};
pub use renderer::{label_for_remaining, BadgeRenderer, UNDER_ONE_MINUTE};
