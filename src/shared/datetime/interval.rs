use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::time_bucketing::{MicroTimestampSampler, MonthTimestampSampler, TimestampSampler};
use crate::engine::errors::SampleByError;
use crate::shared::time::{
    MICROS_PER_DAY, MICROS_PER_HOUR, MICROS_PER_MILLI, MICROS_PER_MINUTE, MICROS_PER_SECOND,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Micro,
    Milli,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl IntervalUnit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(IntervalUnit::Micro),
            'T' => Some(IntervalUnit::Milli),
            's' => Some(IntervalUnit::Second),
            'm' => Some(IntervalUnit::Minute),
            'h' => Some(IntervalUnit::Hour),
            'd' => Some(IntervalUnit::Day),
            'M' => Some(IntervalUnit::Month),
            'y' => Some(IntervalUnit::Year),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            IntervalUnit::Micro => 'U',
            IntervalUnit::Milli => 'T',
            IntervalUnit::Second => 's',
            IntervalUnit::Minute => 'm',
            IntervalUnit::Hour => 'h',
            IntervalUnit::Day => 'd',
            IntervalUnit::Month => 'M',
            IntervalUnit::Year => 'y',
        }
    }

    fn micros(&self) -> Option<i64> {
        match self {
            IntervalUnit::Micro => Some(1),
            IntervalUnit::Milli => Some(MICROS_PER_MILLI),
            IntervalUnit::Second => Some(MICROS_PER_SECOND),
            IntervalUnit::Minute => Some(MICROS_PER_MINUTE),
            IntervalUnit::Hour => Some(MICROS_PER_HOUR),
            IntervalUnit::Day => Some(MICROS_PER_DAY),
            IntervalUnit::Month | IntervalUnit::Year => None,
        }
    }
}

/// Sampling interval such as `15m`, `1h` or `3M`. The count defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleInterval {
    pub count: i64,
    pub unit: IntervalUnit,
}

impl SampleInterval {
    /// Build the sampler for this interval.
    pub fn sampler(&self) -> Result<Arc<dyn TimestampSampler>, SampleByError> {
        let overflow = || SampleByError::InvalidInterval(self.to_string());
        match self.unit {
            IntervalUnit::Month => Ok(Arc::new(MonthTimestampSampler::new(self.count))),
            IntervalUnit::Year => {
                let months = self.count.checked_mul(12).ok_or_else(overflow)?;
                Ok(Arc::new(MonthTimestampSampler::new(months)))
            }
            unit => {
                let micros = unit
                    .micros()
                    .and_then(|m| m.checked_mul(self.count))
                    .ok_or_else(overflow)?;
                Ok(Arc::new(MicroTimestampSampler::new(micros)))
            }
        }
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.as_char())
    }
}

impl FromStr for SampleInterval {
    type Err = SampleByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SampleByError::InvalidInterval(s.to_string());
        let trimmed = s.trim();
        let unit_char = trimmed.chars().last().ok_or_else(invalid)?;
        let unit = IntervalUnit::from_char(unit_char).ok_or_else(invalid)?;
        let digits = &trimmed[..trimmed.len() - unit_char.len_utf8()];
        let count = if digits.is_empty() {
            1
        } else {
            if !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse::<i64>().map_err(|_| invalid())?
        };
        if count <= 0 {
            return Err(invalid());
        }
        Ok(SampleInterval { count, unit })
    }
}

/// Parse an interval string straight into a sampler.
pub fn sampler_from_interval(interval: &str) -> Result<Arc<dyn TimestampSampler>, SampleByError> {
    interval.parse::<SampleInterval>()?.sampler()
}
