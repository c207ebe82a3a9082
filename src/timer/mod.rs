//! Timer vocabulary: categories and duration resolution

pub mod category;
pub mod duration;

pub use category::TimerCategory;
pub use duration::{resolve_duration_ms, MS_PER_MINUTE};
