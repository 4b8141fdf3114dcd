use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

pub const MICROS_PER_MILLI: i64 = 1_000;
pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
pub const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// Utility for parsing and rendering timestamps held as epoch microseconds (UTC).
pub struct TimeParser;

impl TimeParser {
    /// Parse a string representing a time instant into epoch microseconds.
    /// Supports RFC3339/ISO-8601, date-only (YYYY-MM-DD) and plain integers
    /// (taken as microseconds).
    pub fn parse_str_to_micros(input: &str) -> Option<i64> {
        let s = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc).timestamp_micros());
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            let dt = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
            return Some(dt.timestamp_micros());
        }
        s.parse::<i64>().ok()
    }

    /// Render epoch microseconds as RFC3339 with microsecond precision.
    /// Falls back to the raw number when the instant is outside chrono's range.
    pub fn format_micros(micros: i64) -> String {
        match DateTime::<Utc>::from_timestamp_micros(micros) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Micros, true),
            None => micros.to_string(),
        }
    }
}
