//! Durable storage of the countdown record

use std::{
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::TimerState;

/// Errors raised while writing the record
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write timer record: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode timer record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("timer record store is poisoned")]
    Poisoned,
}

/// Flat key-value record as it is laid out on disk
///
/// Every field is optional so that a partially written or older record still
/// parses; [`PersistedRecord::into_state`] decides whether it is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub start_time_in_mills: Option<u64>,
    pub mills_left: Option<u64>,
    pub timer_running: Option<bool>,
    pub end_time: Option<i64>,
}

impl PersistedRecord {
    /// Capture all four fields of a state
    pub fn from_state(state: &TimerState) -> Self {
        Self {
            start_time_in_mills: Some(state.duration_ms),
            mills_left: Some(state.remaining_ms),
            timer_running: Some(state.running),
            end_time: Some(state.end_timestamp_ms.unwrap_or(0)),
        }
    }

    /// Rebuild a state, or `None` when a field is missing or the values are inconsistent
    pub fn into_state(self) -> Option<TimerState> {
        let duration_ms = self.start_time_in_mills?;
        let remaining_ms = self.mills_left?;
        let running = self.timer_running?;
        let end_time = self.end_time?;

        if remaining_ms > duration_ms {
            return None;
        }

        Some(TimerState {
            duration_ms,
            remaining_ms,
            running,
            end_timestamp_ms: running.then_some(end_time),
        })
    }
}

/// Storage for the countdown record across process suspension
pub trait TimerStore: Send + Sync + fmt::Debug {
    /// Replace any previous record with `state`
    fn save(&self, state: &TimerState) -> Result<(), StoreError>;

    /// Read the record back, substituting the default state when it is absent or unusable
    fn load(&self) -> TimerState;
}

/// Record kept as a JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn read_record(&self) -> Option<PersistedRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No saved timer at {}, using defaults", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unreadable timer record {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

impl TimerStore for JsonFileStore {
    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        let record = PersistedRecord::from_state(state);
        let bytes = serde_json::to_vec_pretty(&record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write next to the target and rename so a crash never leaves half a record
        let tmp = self.temp_path();
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &self.path)?;

        debug!("Saved timer record to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> TimerState {
        let Some(record) = self.read_record() else {
            return TimerState::default();
        };

        record.into_state().unwrap_or_else(|| {
            warn!("Timer record {} is incomplete, using defaults", self.path.display());
            TimerState::default()
        })
    }
}

/// In-process record, for tests and for hosts without a filesystem
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<PersistedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary, possibly partial, record
    pub fn with_record(record: PersistedRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    pub fn record(&self) -> Option<PersistedRecord> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl TimerStore for MemoryStore {
    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        let mut record = self.record.lock().map_err(|_| StoreError::Poisoned)?;
        *record = Some(PersistedRecord::from_state(state));
        Ok(())
    }

    fn load(&self) -> TimerState {
        self.record()
            .and_then(PersistedRecord::into_state)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerEngine;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clock-timer-{}-{}.json", std::process::id(), name))
    }

    fn reachable_states() -> Vec<TimerState> {
        let t0 = 1_700_000_000_000;
        let mut states = vec![TimerState::default()];

        let mut engine = TimerEngine::new();
        engine.set_duration(90_000).unwrap();
        states.push(engine.state());

        engine.start(t0).unwrap();
        engine.tick(t0 + 1000);
        states.push(engine.state());

        engine.pause(t0 + 2500).unwrap();
        states.push(engine.state());

        engine.start(t0 + 10_000).unwrap();
        engine.tick(t0 + 200_000);
        states.push(engine.state());
        states
    }

    #[test]
    fn memory_store_round_trips_reachable_states() {
        let store = MemoryStore::new();
        for state in reachable_states() {
            store.save(&state).unwrap();
            assert_eq!(store.load(), state);
        }
    }

    #[test]
    fn file_store_round_trips_and_replaces() {
        let path = temp_file("round-trip");
        let store = JsonFileStore::new(&path);
        for state in reachable_states() {
            store.save(&state).unwrap();
            assert_eq!(store.load(), state);
        }
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_uses_flat_field_names() {
        let path = temp_file("field-names");
        let store = JsonFileStore::new(&path);
        let state = TimerState {
            duration_ms: 60_000,
            remaining_ms: 45_000,
            running: true,
            end_timestamp_ms: Some(1_700_000_045_000),
        };
        store.save(&state).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["startTimeInMills"], 60_000);
        assert_eq!(value["millsLeft"], 45_000);
        assert_eq!(value["timerRunning"], true);
        assert_eq!(value["endTime"], 1_700_000_045_000i64);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_loads_default() {
        let store = JsonFileStore::new(temp_file("does-not-exist"));
        assert_eq!(store.load(), TimerState::default());
    }

    #[test]
    fn garbage_file_loads_default() {
        let path = temp_file("garbage");
        fs::write(&path, b"not json at all").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), TimerState::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_field_loads_default() {
        let store = MemoryStore::with_record(PersistedRecord {
            start_time_in_mills: Some(60_000),
            mills_left: Some(30_000),
            timer_running: Some(false),
            end_time: None,
        });
        assert_eq!(store.load(), TimerState::default());
    }

    #[test]
    fn inconsistent_record_loads_default() {
        let store = MemoryStore::with_record(PersistedRecord {
            start_time_in_mills: Some(60_000),
            mills_left: Some(90_000),
            timer_running: Some(false),
            end_time: Some(0),
        });
        assert_eq!(store.load(), TimerState::default());
    }

    #[test]
    fn stale_end_time_is_ignored_when_stopped() {
        let record = PersistedRecord {
            start_time_in_mills: Some(60_000),
            mills_left: Some(20_000),
            timer_running: Some(false),
            end_time: Some(1_700_000_000_000),
        };
        let state = record.into_state().unwrap();
        assert_eq!(state.end_timestamp_ms, None);
        assert_eq!(state.remaining_ms, 20_000);
    }
}
