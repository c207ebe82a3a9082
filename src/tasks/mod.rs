//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod timer_loop;
pub mod wake_up_recovery;

// Re-export main functions
pub use timer_loop::timer_event_loop;
pub use wake_up_recovery::wake_up_recovery_task;
