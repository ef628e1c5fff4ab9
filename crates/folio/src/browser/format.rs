//! Display formatting for statistics.

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Compact count: `1.2M`, `3.4K` or plain digits below 1000.
///
/// One decimal, rounded half up.
#[must_use]
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        compact(n, 1_000_000, 'M')
    } else if n >= 1_000 {
        compact(n, 1_000, 'K')
    } else {
        n.to_string()
    }
}

fn compact(n: u64, unit: u64, suffix: char) -> String {
    let tenths = (u128::from(n) * 10 + u128::from(unit) / 2) / u128::from(unit);
    format!("{}.{}{suffix}", tenths / 10, tenths % 10)
}

/// Age of `timestamp_ms` relative to `now_ms`, e.g. `"5m ago"`.
///
/// Timestamps in the future read as "Just now"; anything a week or older
/// reads as "Recently".
#[must_use]
pub fn format_relative_time(timestamp_ms: u64, now_ms: u64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minutes = diff / MINUTE_MS;
    let hours = diff / HOUR_MS;
    let days = diff / DAY_MS;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        "Recently".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_plain() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn test_format_number_thousands() {
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(1_234), "1.2K");
        assert_eq!(format_number(1_250), "1.3K");
        assert_eq!(format_number(45_678), "45.7K");
        assert_eq!(format_number(999_999), "1000.0K");
    }

    #[test]
    fn test_format_number_millions() {
        assert_eq!(format_number(1_000_000), "1.0M");
        assert_eq!(format_number(2_540_000), "2.5M");
        assert_eq!(format_number(u64::MAX), "18446744073709.6M");
    }

    #[test]
    fn test_format_relative_time() {
        let now = 10 * DAY_MS;
        assert_eq!(format_relative_time(now, now), "Just now");
        assert_eq!(format_relative_time(now - 59_999, now), "Just now");
        assert_eq!(format_relative_time(now - MINUTE_MS, now), "1m ago");
        assert_eq!(format_relative_time(now - 59 * MINUTE_MS, now), "59m ago");
        assert_eq!(format_relative_time(now - HOUR_MS, now), "1h ago");
        assert_eq!(format_relative_time(now - 23 * HOUR_MS, now), "23h ago");
        assert_eq!(format_relative_time(now - DAY_MS, now), "1d ago");
        assert_eq!(format_relative_time(now - 6 * DAY_MS, now), "6d ago");
        assert_eq!(format_relative_time(now - 7 * DAY_MS, now), "Recently");
    }

    #[test]
    fn test_format_relative_time_future() {
        assert_eq!(format_relative_time(5_000, 1_000), "Just now");
    }
}
