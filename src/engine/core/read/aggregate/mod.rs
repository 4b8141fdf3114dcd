pub mod map_value;
pub mod ops;
pub mod plan;

pub use map_value::{LONG_NULL, SimpleMapValue, ValueLayout};
pub use ops::GroupByFunction;
pub use plan::AggregateOpSpec;
