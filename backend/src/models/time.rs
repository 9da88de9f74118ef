//! Timestamp parsing and the trailing history window.
//!
//! History timestamps are local wall-clock times written by whatever appends
//! to the sheet, so they are handled as naive date-times and compared against
//! the server's local clock.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format the history sheet writes timestamps in.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Default trailing lookback.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Longest accepted lookback, one leap year.
pub const MAX_WINDOW_HOURS: i64 = 366 * 24;

/// Parse a history timestamp cell. Surrounding whitespace is ignored.
pub fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, format).ok()
}

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Closed interval `[start, end]` of accepted history timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl HistoryWindow {
    /// The `hours` leading up to `now`. A lookback past the representable
    /// range saturates at the earliest date-time.
    pub fn trailing(now: NaiveDateTime, hours: i64) -> Self {
        let start = Duration::try_hours(hours)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(NaiveDateTime::MIN);
        Self { start, end: now }
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.start && ts <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_default_format() {
        let ts = parse_timestamp("07/11/2024 09:30:00", DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(ts, at(9, 30));
        assert_eq!(
            parse_timestamp("  07/11/2024 09:30:00 ", DEFAULT_TIMESTAMP_FORMAT),
            Some(at(9, 30))
        );
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(parse_timestamp("2024-11-07 09:30:00", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("07/11/2024", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("", DEFAULT_TIMESTAMP_FORMAT).is_none());
        assert!(parse_timestamp("31/02/2024 10:00:00", DEFAULT_TIMESTAMP_FORMAT).is_none());
    }

    #[test]
    fn test_trailing_window_bounds() {
        let now = at(12, 0);
        let window = HistoryWindow::trailing(now, 24);

        assert!(window.contains(now));
        assert!(window.contains(now - Duration::hours(24)));
        assert!(!window.contains(now - Duration::hours(24) - Duration::seconds(1)));
        assert!(!window.contains(now + Duration::seconds(1)));
    }

    #[test]
    fn test_oversized_window_saturates() {
        let now = at(12, 0);
        let window = HistoryWindow::trailing(now, i64::MAX);
        assert_eq!(window.start, NaiveDateTime::MIN);
        assert!(window.contains(at(0, 0)));

        let window = HistoryWindow::trailing(now, i64::MAX / 3600);
        assert_eq!(window.end, now);
        assert!(window.contains(now));
    }

    #[test]
    fn test_serializes_iso() {
        let json = serde_json::to_string(&at(9, 5)).unwrap();
        assert_eq!(json, "\"2024-11-07T09:05:00\"");
    }
}
