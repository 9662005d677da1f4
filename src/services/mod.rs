//! External collaborators module
//! 
//! This module contains the wall-clock source and the durable record store
//! the countdown depends on.

pub mod clock;
pub mod persistence;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use persistence::{JsonFileStore, MemoryStore, PersistedRecord, StoreError, TimerStore};
