//! Countdown text rendering

/// Render remaining milliseconds as `H:MM:SS`, or `MM:SS` under an hour
pub fn format_remaining(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_an_hour_is_padded() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(999), "00:00");
        assert_eq!(format_remaining(59_000), "00:59");
        assert_eq!(format_remaining(600_000), "10:00");
        assert_eq!(format_remaining(3_599_999), "59:59");
    }

    #[test]
    fn hours_are_unpadded() {
        assert_eq!(format_remaining(3_600_000), "1:00:00");
        assert_eq!(format_remaining(3_661_000), "1:01:01");
        assert_eq!(format_remaining(36_005_000), "10:00:05");
    }
}
