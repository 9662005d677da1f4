//! Countdown state structures

use serde::{Deserialize, Serialize};

use crate::timer::format_remaining;

/// Duration used when no saved record exists (10 minutes)
pub const DEFAULT_DURATION_MS: u64 = 600_000;

/// Countdown state, the single record that is persisted across suspension
///
/// While `running` is true `end_timestamp_ms` is set and `remaining_ms` is
/// derived from it. While stopped `remaining_ms` is authoritative and
/// `end_timestamp_ms` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub duration_ms: u64,
    pub remaining_ms: u64,
    pub running: bool,
    pub end_timestamp_ms: Option<i64>,
}

impl TimerState {
    /// Create a stopped state with the full duration remaining
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            running: false,
            end_timestamp_ms: None,
        }
    }

    /// Derive the phase a presentation layer should show
    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_ms == 0 {
            TimerPhase::Finished
        } else if self.remaining_ms == self.duration_ms {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// Check the structural invariants of a state
    pub fn is_consistent(&self) -> bool {
        self.remaining_ms <= self.duration_ms && self.running == self.end_timestamp_ms.is_some()
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

/// Coarse countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Read-only view of the countdown handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub duration_ms: u64,
    pub remaining_ms: u64,
    /// Formatted countdown text
    pub display: String,
    pub can_start: bool,
    pub can_reset: bool,
    pub can_set: bool,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            phase: state.phase(),
            duration_ms: state.duration_ms,
            remaining_ms: state.remaining_ms,
            display: format_remaining(state.remaining_ms),
            can_start: !state.running && state.remaining_ms > 0,
            can_reset: !state.running && state.remaining_ms < state.duration_ms,
            can_set: !state.running,
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::from(&TimerState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_idle_minutes() {
        let state = TimerState::default();
        assert_eq!(state.duration_ms, 600_000);
        assert_eq!(state.remaining_ms, 600_000);
        assert!(!state.running);
        assert_eq!(state.phase(), TimerPhase::Idle);
        assert!(state.is_consistent());
    }

    #[test]
    fn phase_follows_remaining_time() {
        let mut state = TimerState::new(60_000);
        state.remaining_ms = 30_000;
        assert_eq!(state.phase(), TimerPhase::Paused);

        state.remaining_ms = 0;
        assert_eq!(state.phase(), TimerPhase::Finished);

        state.running = true;
        state.end_timestamp_ms = Some(1);
        assert_eq!(state.phase(), TimerPhase::Running);
    }

    #[test]
    fn snapshot_control_hints() {
        let mut state = TimerState::new(60_000);
        let idle = TimerSnapshot::from(&state);
        assert!(idle.can_start && !idle.can_reset && idle.can_set);
        assert_eq!(idle.display, "01:00");

        state.remaining_ms = 0;
        let finished = TimerSnapshot::from(&state);
        assert!(!finished.can_start && finished.can_reset);

        state.remaining_ms = 20_000;
        state.running = true;
        state.end_timestamp_ms = Some(20_000);
        let running = TimerSnapshot::from(&state);
        assert!(!running.can_start && !running.can_reset && !running.can_set);
    }
}
