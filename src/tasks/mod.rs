//! Background tasks module
//! 
//! This module contains the periodic tick schedule that drives the countdown
//! alongside the HTTP server.

pub mod ticker;

// Re-export main types
pub use ticker::{Ticker, TickerError, TICK_INTERVAL};
