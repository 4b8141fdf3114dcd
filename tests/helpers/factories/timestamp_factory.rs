use chrono::{TimeZone, Utc};

/// Factory for test timestamps in epoch microseconds
pub struct TimestampFactory;

impl TimestampFactory {
    /// Create timestamp for a specific UTC date/time
    pub fn utc_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .unwrap()
            .timestamp_micros()
    }

    /// Create timestamp for start of day
    pub fn utc_date(year: i32, month: u32, day: u32) -> i64 {
        Self::utc_datetime(year, month, day, 0, 0, 0)
    }

    /// Create timestamp for the first day of a month
    pub fn month(year: i32, month: u32) -> i64 {
        Self::utc_date(year, month, 1)
    }

    /// Create timestamp for a specific hour of a day
    pub fn hour(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Self::utc_datetime(year, month, day, hour, 0, 0)
    }

    /// Whole seconds since epoch as micros
    pub fn seconds(secs: i64) -> i64 {
        secs * 1_000_000
    }
}
