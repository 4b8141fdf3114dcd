use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::engine::core::read::aggregate::{GroupByFunction, SimpleMapValue};
use crate::engine::core::read::cursor::Record;
use crate::engine::types::{ColumnType, ScalarValue};

/// Which function list backs the output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordView {
    /// Columns read from the aggregate state of a bucket with input rows.
    Real,
    /// Columns read from fill values for a bucket without input rows.
    Filler,
}

/// Bucket boundary shared between the cursor and its timestamp columns.
#[derive(Debug, Clone, Default)]
pub struct SharedTimestamp(Arc<AtomicI64>);

impl SharedTimestamp {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, timestamp: i64) {
        self.0.store(timestamp, Ordering::Relaxed);
    }
}

impl PartialEq for SharedTimestamp {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One output column of a sampled record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordFunction {
    /// Value computed by an aggregate from the state buffer.
    Aggregate(GroupByFunction),
    /// Start of the bucket being emitted.
    Timestamp(SharedTimestamp),
    /// Fixed value, typically a fill placeholder.
    Constant {
        value: ScalarValue,
        column_type: ColumnType,
    },
}

impl RecordFunction {
    pub fn constant(value: ScalarValue, column_type: ColumnType) -> Self {
        RecordFunction::Constant { value, column_type }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            RecordFunction::Aggregate(f) => f.output_type(),
            RecordFunction::Timestamp(_) => ColumnType::Timestamp,
            RecordFunction::Constant { column_type, .. } => *column_type,
        }
    }

    fn get_long(&self, value: &SimpleMapValue) -> Option<i64> {
        match self {
            RecordFunction::Aggregate(f) => f.get_long(value),
            RecordFunction::Timestamp(ts) => Some(ts.get()),
            RecordFunction::Constant { value, .. } => value.as_i64(),
        }
    }

    fn get_double(&self, value: &SimpleMapValue) -> Option<f64> {
        match self {
            RecordFunction::Aggregate(f) => f.get_double(value),
            RecordFunction::Timestamp(ts) => Some(ts.get() as f64),
            RecordFunction::Constant { value, .. } => value.as_f64(),
        }
    }

    fn get_timestamp(&self, value: &SimpleMapValue) -> Option<i64> {
        match self {
            RecordFunction::Aggregate(f) => f.get_timestamp(value),
            RecordFunction::Timestamp(ts) => Some(ts.get()),
            RecordFunction::Constant {
                value: ScalarValue::Timestamp(ts),
                ..
            } => Some(*ts),
            RecordFunction::Constant { .. } => None,
        }
    }

    pub fn value(&self, value: &SimpleMapValue) -> ScalarValue {
        match self {
            RecordFunction::Aggregate(f) => f.value(value),
            RecordFunction::Timestamp(ts) => ScalarValue::Timestamp(ts.get()),
            RecordFunction::Constant { value, .. } => value.clone(),
        }
    }
}

/// Output record presenting either the aggregate state or the fill values
/// through one column layout. Switching views never allocates.
#[derive(Debug, Clone)]
pub struct SplitRecord {
    real: Vec<RecordFunction>,
    filler: Vec<RecordFunction>,
    active: RecordView,
    value: SimpleMapValue,
}

impl SplitRecord {
    /// Both lists must have the same length; position `i` of each backs output column `i`.
    pub fn new(real: Vec<RecordFunction>, filler: Vec<RecordFunction>, value: SimpleMapValue) -> Self {
        debug_assert_eq!(real.len(), filler.len());
        Self {
            real,
            filler,
            active: RecordView::Real,
            value,
        }
    }

    #[inline]
    pub fn set_active(&mut self, view: RecordView) {
        self.active = view;
    }

    pub fn active(&self) -> RecordView {
        self.active
    }

    pub fn column_count(&self) -> usize {
        self.real.len()
    }

    pub fn value_mut(&mut self) -> &mut SimpleMapValue {
        &mut self.value
    }

    #[inline]
    fn function(&self, col: usize) -> Option<&RecordFunction> {
        match self.active {
            RecordView::Real => self.real.get(col),
            RecordView::Filler => self.filler.get(col),
        }
    }
}

impl Record for SplitRecord {
    fn get_bool(&self, col: usize) -> Option<bool> {
        match self.function(col)? {
            RecordFunction::Constant { value, .. } => value.as_bool(),
            _ => None,
        }
    }

    fn get_int(&self, col: usize) -> Option<i32> {
        self.get_long(col).and_then(|v| i32::try_from(v).ok())
    }

    fn get_long(&self, col: usize) -> Option<i64> {
        self.function(col)?.get_long(&self.value)
    }

    fn get_double(&self, col: usize) -> Option<f64> {
        self.function(col)?.get_double(&self.value)
    }

    fn get_timestamp(&self, col: usize) -> Option<i64> {
        self.function(col)?.get_timestamp(&self.value)
    }

    fn get_str(&self, col: usize) -> Option<&str> {
        match self.function(col)? {
            RecordFunction::Constant { value, .. } => value.as_str(),
            _ => None,
        }
    }

    fn value(&self, col: usize, _column_type: ColumnType) -> ScalarValue {
        self.function(col)
            .map(|f| f.value(&self.value))
            .unwrap_or(ScalarValue::Null)
    }
}
