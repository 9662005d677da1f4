//! Clock Timer - a countdown timer that survives pause, resume and suspension
//! 
//! This library provides the countdown core (input parsing, display
//! formatting, the state machine), the tick schedule and record store around
//! it, and an HTTP surface for presentation layers and host lifecycle hooks.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerSnapshot, TimerState};
pub use timer::TimerEngine;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
