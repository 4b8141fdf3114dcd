pub use super::factories::{
    CountingInterruptor, MemCursorFactory, SampleByPlanFactory, TimestampFactory, TrackingCursor,
};

pub struct Factory;

impl Factory {
    pub fn mem_cursor() -> MemCursorFactory {
        MemCursorFactory::new()
    }

    pub fn sample_by_plan() -> SampleByPlanFactory {
        SampleByPlanFactory::new()
    }

    pub fn counting_interruptor(allowed_checks: usize) -> CountingInterruptor {
        CountingInterruptor::new(allowed_checks)
    }
}
