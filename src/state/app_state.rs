//! Main application state management

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::TimerSnapshot;
use crate::{
    services::{Clock, TimerStore},
    tasks::{Ticker, TickerError},
    timer::{parse_duration_ms, TimerEngine, TimerError},
};

/// Errors surfaced by application state operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error("failed to lock {0}")]
    Lock(&'static str),
}

impl AppError {
    /// Whether the caller caused this error and can recover by acting differently
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::Timer(_))
    }
}

/// Shared application state: the countdown engine, its tick schedule and its store
///
/// Every operation takes the engine lock for its whole duration, so user
/// actions, ticks and lifecycle hooks never interleave.
#[derive(Debug)]
pub struct AppState {
    engine: Mutex<TimerEngine>,
    ticker: Mutex<Ticker>,
    store: Arc<dyn TimerStore>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create an idle state; call [`on_resume`](Self::on_resume) to pick up a saved countdown
    pub fn new(store: Arc<dyn TimerStore>, clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        let engine = TimerEngine::new();
        let (timer_update_tx, timer_update_rx) = watch::channel(engine.snapshot());

        Self {
            engine: Mutex::new(engine),
            ticker: Mutex::new(Ticker::new()),
            store,
            clock,
            tick_interval,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Watch every published countdown change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, TimerEngine>, AppError> {
        self.engine.lock().map_err(|_| AppError::Lock("timer engine"))
    }

    fn lock_ticker(&self) -> Result<MutexGuard<'_, Ticker>, AppError> {
        self.ticker.lock().map_err(|_| AppError::Lock("ticker"))
    }

    fn publish(&self, snapshot: &TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Current countdown, brought up to date with the wall clock
    pub fn snapshot(&self) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        let was_running = engine.is_running();
        engine.tick(self.clock.now_ms());
        let snapshot = engine.snapshot();
        drop(engine);

        if was_running {
            self.publish(&snapshot);
        }
        Ok(snapshot)
    }

    /// Whether a tick schedule is currently driving the countdown
    pub fn is_ticking(&self) -> bool {
        self.ticker.lock().map(|t| t.is_active()).unwrap_or(false)
    }

    /// Parse raw minute text and configure it as the countdown length
    pub fn set_duration_from_input(&self, raw: &str) -> Result<TimerSnapshot, AppError> {
        let duration_ms = parse_duration_ms(raw)?;
        self.set_duration(duration_ms)
    }

    /// Configure the countdown length; only allowed while stopped
    pub fn set_duration(&self, duration_ms: u64) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        engine.set_duration(duration_ms)?;
        self.lock_ticker()?.cancel();
        let snapshot = engine.snapshot();
        drop(engine);

        info!("Timer set to {}", snapshot.display);
        self.record_action("set");
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Start or resume the countdown and its tick schedule
    pub fn start(self: &Arc<Self>) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        let snapshot = self.start_locked(&mut engine)?;
        drop(engine);

        self.after_action("start", &snapshot);
        Ok(snapshot)
    }

    /// Freeze the countdown and cancel its tick schedule
    pub fn pause(&self) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        let snapshot = self.pause_locked(&mut engine)?;
        drop(engine);

        self.after_action("pause", &snapshot);
        Ok(snapshot)
    }

    /// Start when stopped, pause when running
    pub fn toggle(self: &Arc<Self>) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        let (action, snapshot) = if engine.is_running() {
            ("pause", self.pause_locked(&mut engine)?)
        } else {
            ("start", self.start_locked(&mut engine)?)
        };
        drop(engine);

        self.after_action(action, &snapshot);
        Ok(snapshot)
    }

    fn start_locked(self: &Arc<Self>, engine: &mut TimerEngine) -> Result<TimerSnapshot, AppError> {
        // Taken before the engine moves so a failure leaves nothing half started
        let mut ticker = self.lock_ticker()?;
        let before = engine.state();
        engine.start(self.clock.now_ms())?;

        // Clears a schedule that ended on its own when the last countdown finished
        ticker.cancel();
        if let Err(e) = self.schedule_ticks(&mut ticker) {
            *engine = TimerEngine::from_state(before);
            return Err(e);
        }
        Ok(engine.snapshot())
    }

    fn pause_locked(&self, engine: &mut TimerEngine) -> Result<TimerSnapshot, AppError> {
        let mut ticker = self.lock_ticker()?;
        engine.pause(self.clock.now_ms())?;
        ticker.cancel();
        Ok(engine.snapshot())
    }

    fn after_action(&self, action: &str, snapshot: &TimerSnapshot) {
        match action {
            "start" => info!("Timer started with {} remaining", snapshot.display),
            _ => info!("Timer paused at {}", snapshot.display),
        }
        self.record_action(action);
        self.publish(snapshot);
    }

    /// Stop and refill the countdown, from any phase
    pub fn reset(&self) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        engine.reset();
        self.lock_ticker()?.cancel();
        let snapshot = engine.snapshot();
        drop(engine);

        info!("Timer reset to {}", snapshot.display);
        self.record_action("reset");
        self.publish(&snapshot);
        Ok(snapshot)
    }

    /// Suspend hook: cancel ticking and persist the countdown
    ///
    /// A failed write is logged and dropped; the next load falls back to defaults.
    pub fn on_suspend(&self) -> Result<TimerSnapshot, AppError> {
        let engine = self.lock_engine()?;
        self.lock_ticker()?.cancel();

        let state = engine.state();
        match self.store.save(&state) {
            Ok(()) => info!("Timer saved ({:?}, {}ms left)", state.phase(), state.remaining_ms),
            Err(e) => warn!("Failed to save timer, it will not survive suspension: {}", e),
        }
        let snapshot = engine.snapshot();
        drop(engine);

        self.record_action("suspend");
        Ok(snapshot)
    }

    /// Resume hook: reload the countdown, reconcile it with the wall clock and restart ticking
    pub fn on_resume(self: &Arc<Self>) -> Result<TimerSnapshot, AppError> {
        let mut engine = self.lock_engine()?;
        let mut ticker = self.lock_ticker()?;
        ticker.cancel();

        *engine = TimerEngine::from_state(self.store.load());
        engine.reconcile(self.clock.now_ms());

        if engine.is_running() {
            self.schedule_ticks(&mut ticker)?;
        }
        drop(ticker);

        let snapshot = engine.snapshot();
        drop(engine);

        info!("Timer restored ({:?}, {} left)", snapshot.phase, snapshot.display);
        self.record_action("resume");
        self.publish(&snapshot);
        Ok(snapshot)
    }

    fn schedule_ticks(self: &Arc<Self>, ticker: &mut Ticker) -> Result<(), AppError> {
        let state = Arc::downgrade(self);
        ticker.schedule(self.tick_interval, move || match state.upgrade() {
            Some(state) => state.on_tick(),
            None => ControlFlow::Break(()),
        })?;
        Ok(())
    }

    fn on_tick(&self) -> ControlFlow<()> {
        let mut engine = match self.lock_engine() {
            Ok(engine) => engine,
            Err(e) => {
                error!("Stopping tick schedule: {}", e);
                return ControlFlow::Break(());
            }
        };
        engine.tick(self.clock.now_ms());
        let snapshot = engine.snapshot();
        let running = engine.is_running();
        drop(engine);

        self.publish(&snapshot);
        if running {
            debug!("Tick: {} remaining", snapshot.display);
            ControlFlow::Continue(())
        } else {
            info!("Countdown finished");
            ControlFlow::Break(())
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
