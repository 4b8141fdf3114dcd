pub mod interruptor_factory;
pub mod mem_cursor_factory;
pub mod sample_by_plan_factory;
pub mod timestamp_factory;
pub mod tracking_cursor;

pub use interruptor_factory::CountingInterruptor;
pub use mem_cursor_factory::MemCursorFactory;
pub use sample_by_plan_factory::SampleByPlanFactory;
pub use timestamp_factory::TimestampFactory;
pub use tracking_cursor::{TrackingCursor, TrackingStats};

#[cfg(test)]
mod mem_cursor_factory_test;
#[cfg(test)]
mod timestamp_factory_test;
