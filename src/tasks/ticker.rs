//! Cancellable periodic tick schedule

use std::{ops::ControlFlow, time::Duration};
use thiserror::Error;
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::debug;

/// Default spacing between countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("a tick schedule is already active")]
    AlreadyActive,
}

/// Handle to at most one periodic tick task on the tokio runtime
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schedule is still firing
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Invoke `on_tick` every `period` until it breaks or the schedule is cancelled
    ///
    /// The first call happens one full period after scheduling.
    pub fn schedule<F>(&mut self, period: Duration, mut on_tick: F) -> Result<(), TickerError>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        if self.is_active() {
            return Err(TickerError::AlreadyActive);
        }

        self.handle = Some(tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // An interval completes its first tick immediately
            ticks.tick().await;

            loop {
                ticks.tick().await;
                if on_tick().is_break() {
                    debug!("Tick schedule ended by its callback");
                    break;
                }
            }
        }));
        Ok(())
    }

    /// Stop the schedule; does nothing if it already ended
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Cancelling tick schedule");
            }
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tokio::time::sleep;

    fn counting(count: &Arc<AtomicUsize>, stop_after: usize) -> impl FnMut() -> ControlFlow<()> + Send + 'static {
        let count = Arc::clone(count);
        move || {
            let seen = count.fetch_add(1, Ordering::SeqCst) + 1;
            if seen >= stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new();
        ticker.schedule(TICK_INTERVAL, counting(&count, usize::MAX)).unwrap();

        sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_active());
        ticker.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks_and_is_idempotent() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new();
        ticker.schedule(TICK_INTERVAL, counting(&count, usize::MAX)).unwrap();

        sleep(Duration::from_millis(1500)).await;
        ticker.cancel();
        ticker.cancel();
        sleep(Duration::from_millis(5000)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn callback_break_ends_schedule() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new();
        ticker.schedule(TICK_INTERVAL, counting(&count, 2)).unwrap();

        sleep(Duration::from_millis(5500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!ticker.is_active());

        // A finished schedule does not block a new one
        ticker.schedule(TICK_INTERVAL, counting(&count, 3)).unwrap();
        ticker.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn second_schedule_while_active_is_rejected() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = Ticker::new();
        ticker.schedule(TICK_INTERVAL, counting(&count, usize::MAX)).unwrap();
        assert_eq!(
            ticker.schedule(TICK_INTERVAL, counting(&count, usize::MAX)),
            Err(TickerError::AlreadyActive)
        );
        ticker.cancel();
    }
}
