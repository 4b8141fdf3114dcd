pub mod interval;
pub mod time_bucketing;

pub use interval::{IntervalUnit, SampleInterval, sampler_from_interval};
pub use time_bucketing::{MicroTimestampSampler, MonthTimestampSampler, TimestampSampler};
