use std::fmt;

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Bucketing policy for SAMPLE BY: maps timestamps to the start of their
/// bucket and steps from one bucket start to the next.
///
/// Both operations are pure. Timestamps are epoch microseconds (UTC).
pub trait TimestampSampler: Send + Sync + fmt::Debug {
    /// Start of the bucket containing `timestamp`, or `None` when that start
    /// is not representable.
    fn round(&self, timestamp: i64) -> Option<i64>;

    /// Start of the bucket following the one that starts at `timestamp`.
    fn next_timestamp(&self, timestamp: i64) -> i64;
}

/// Fixed-width buckets aligned on the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroTimestampSampler {
    bucket: i64,
}

impl MicroTimestampSampler {
    /// `bucket` is the width in microseconds and must be positive.
    pub fn new(bucket: i64) -> Self {
        debug_assert!(bucket > 0, "bucket width must be positive");
        Self {
            bucket: bucket.max(1),
        }
    }
}

impl TimestampSampler for MicroTimestampSampler {
    #[inline]
    fn round(&self, timestamp: i64) -> Option<i64> {
        timestamp.checked_sub(timestamp.rem_euclid(self.bucket))
    }

    #[inline]
    fn next_timestamp(&self, timestamp: i64) -> i64 {
        timestamp.saturating_add(self.bucket)
    }
}

/// Calendar buckets of `step` months, aligned on January 1970.
/// Yearly sampling uses a step of `12 * years`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTimestampSampler {
    step: i64,
}

impl MonthTimestampSampler {
    pub fn new(step_months: i64) -> Self {
        debug_assert!(step_months > 0, "month step must be positive");
        Self {
            step: step_months.max(1),
        }
    }

    fn month_index(timestamp: i64) -> Option<i64> {
        let dt = DateTime::<Utc>::from_timestamp_micros(timestamp)?;
        Some((dt.year() as i64 - 1970) * 12 + dt.month0() as i64)
    }

    fn month_start(index: i64) -> Option<i64> {
        let year = i32::try_from(1970 + index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .map(|dt| dt.timestamp_micros())
    }
}

impl TimestampSampler for MonthTimestampSampler {
    fn round(&self, timestamp: i64) -> Option<i64> {
        Self::month_index(timestamp)
            .map(|index| index.div_euclid(self.step) * self.step)
            .and_then(Self::month_start)
    }

    fn next_timestamp(&self, timestamp: i64) -> i64 {
        Self::month_index(timestamp)
            .and_then(|index| index.checked_add(self.step))
            .and_then(Self::month_start)
            .unwrap_or(i64::MAX)
    }
}
