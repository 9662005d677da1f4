//! Countdown operation errors

use thiserror::Error;

/// Recoverable errors raised by countdown operations
///
/// None of these mutate state; the caller surfaces the message and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("timer has already finished, reset or set a new duration first")]
    AlreadyFinished,

    #[error("timer is running, pause or reset it first")]
    Running,

    #[error("timer is not running")]
    NotRunning,

    #[error("countdown would end past the representable time range")]
    EndOutOfRange,
}
