//! State management module
//! 
//! This module contains the countdown state record and the shared application
//! state that serializes every operation on it.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppError, AppState};
pub use timer_state::{TimerPhase, TimerSnapshot, TimerState, DEFAULT_DURATION_MS};
