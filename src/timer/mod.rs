//! Countdown core
//!
//! Input parsing, display formatting and the countdown state machine. Nothing
//! in here touches the runtime, the filesystem or the system clock; every
//! operation that needs the time takes it as epoch milliseconds.

pub mod display;
pub mod engine;
pub mod error;
pub mod input;

pub use display::format_remaining;
pub use engine::TimerEngine;
pub use error::TimerError;
pub use input::{parse_duration_ms, parse_minutes, MAX_DURATION_MS, MILLIS_PER_MINUTE};
