//! Countdown state machine
//!
//! Remaining time while running is always recomputed from an absolute end
//! timestamp, so a late tick or a reconcile after a long suspension lands on
//! the correct value instead of accumulating drift.

use tracing::debug;

use super::{TimerError, MAX_DURATION_MS};
use crate::state::{TimerPhase, TimerSnapshot, TimerState};

/// Countdown engine, owner of the [`TimerState`]
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    /// Create an idle engine with the default duration
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously persisted state; call [`reconcile`](Self::reconcile) next
    pub fn from_state(state: TimerState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state.remaining_ms
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&self.state)
    }

    /// Configure a new countdown length and refill the remaining time
    pub fn set_duration(&mut self, duration_ms: u64) -> Result<(), TimerError> {
        if self.state.running {
            return Err(TimerError::Running);
        }
        if duration_ms > MAX_DURATION_MS {
            return Err(TimerError::InvalidInput(format!("{}ms is too long", duration_ms)));
        }
        self.state = TimerState::new(duration_ms);
        debug!("Duration set to {}ms", duration_ms);
        Ok(())
    }

    /// Start or resume counting down from the frozen remaining time
    pub fn start(&mut self, now_ms: i64) -> Result<(), TimerError> {
        if self.state.running {
            return Err(TimerError::Running);
        }
        if self.state.remaining_ms == 0 {
            return Err(TimerError::AlreadyFinished);
        }

        let end = i64::try_from(self.state.remaining_ms)
            .ok()
            .and_then(|remaining| now_ms.checked_add(remaining))
            .ok_or(TimerError::EndOutOfRange)?;
        self.state.running = true;
        self.state.end_timestamp_ms = Some(end);
        debug!("Started with {}ms remaining, ends at {}", self.state.remaining_ms, end);
        Ok(())
    }

    /// Recompute remaining time from the wall clock, finishing at zero
    pub fn tick(&mut self, now_ms: i64) {
        if !self.state.running {
            return;
        }
        let Some(end) = self.state.end_timestamp_ms else {
            // A running state without an end time cannot count down
            self.finish();
            return;
        };

        let delta = end.saturating_sub(now_ms).max(0) as u64;
        self.state.remaining_ms = delta.min(self.state.duration_ms);
        if self.state.remaining_ms == 0 {
            self.finish();
        }
    }

    /// Freeze the countdown at its exact remaining value
    pub fn pause(&mut self, now_ms: i64) -> Result<(), TimerError> {
        if !self.state.running {
            return Err(TimerError::NotRunning);
        }
        self.tick(now_ms);
        self.state.running = false;
        self.state.end_timestamp_ms = None;
        debug!("Paused with {}ms remaining", self.state.remaining_ms);
        Ok(())
    }

    /// Refill the remaining time and stop, whatever the current phase
    pub fn reset(&mut self) {
        self.state = TimerState::new(self.state.duration_ms);
    }

    /// Bring a freshly loaded state up to date with the wall clock
    pub fn reconcile(&mut self, now_ms: i64) {
        if self.state.running {
            self.tick(now_ms);
        }
    }

    fn finish(&mut self) {
        self.state.remaining_ms = 0;
        self.state.running = false;
        self.state.end_timestamp_ms = None;
        debug!("Countdown finished");
    }
}
