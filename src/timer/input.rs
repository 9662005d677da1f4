//! Parsing of user-entered countdown durations

use super::TimerError;

/// Milliseconds in one minute
pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Longest countdown accepted; leaves room for any epoch start time below it
pub const MAX_DURATION_MS: u64 = (i64::MAX / 2) as u64;

/// Parse raw minute text into a positive number of minutes
pub fn parse_minutes(raw: &str) -> Result<u64, TimerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimerError::InvalidInput("field can't be empty".to_string()));
    }

    let minutes: u64 = trimmed
        .parse()
        .map_err(|_| TimerError::InvalidInput(format!("'{}' is not a whole number of minutes", trimmed)))?;

    if minutes == 0 {
        return Err(TimerError::InvalidInput("please enter a positive number".to_string()));
    }

    Ok(minutes)
}

/// Parse raw minute text straight into milliseconds
pub fn parse_duration_ms(raw: &str) -> Result<u64, TimerError> {
    let minutes = parse_minutes(raw)?;
    minutes
        .checked_mul(MILLIS_PER_MINUTE)
        .filter(|ms| *ms <= MAX_DURATION_MS)
        .ok_or_else(|| TimerError::InvalidInput(format!("{} minutes is too long", minutes)))
}
