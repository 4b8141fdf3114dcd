pub mod read;

pub use read::aggregate::{AggregateOpSpec, GroupByFunction};
pub use read::context::{CancellationToken, ExecutionContext, ExecutionInterruptor};
pub use read::cursor::{MemRecordCursor, Record, RecordCursor, RecordMetadata, collect_rows};
pub use read::sample::{SampleByFillValueCursor, SampleByFillValueFactory, SampleByPlan};
