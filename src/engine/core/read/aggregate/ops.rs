use super::map_value::{LONG_NULL, SimpleMapValue, ValueLayout};
use super::plan::AggregateOpSpec;
use crate::engine::core::read::cursor::{Record, RecordMetadata};
use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};

/// Numeric input column of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericArg {
    pub column: usize,
    pub arg_type: ColumnType,
}

impl NumericArg {
    #[inline]
    fn read_long(&self, record: &dyn Record) -> Option<i64> {
        match self.arg_type {
            ColumnType::Int => record.get_int(self.column).map(i64::from),
            ColumnType::Long => record.get_long(self.column),
            ColumnType::Timestamp => record.get_timestamp(self.column),
            ColumnType::Double => record.get_double(self.column).map(|v| v as i64),
            _ => None,
        }
    }

    #[inline]
    fn read_double(&self, record: &dyn Record) -> Option<f64> {
        match self.arg_type {
            ColumnType::Double => record.get_double(self.column),
            _ => self.read_long(record).map(|v| v as f64),
        }
    }

    /// Slot type able to hold the argument without loss.
    fn slot_type(&self) -> ColumnType {
        match self.arg_type {
            ColumnType::Double => ColumnType::Double,
            ColumnType::Timestamp => ColumnType::Timestamp,
            _ => ColumnType::Long,
        }
    }

    /// Copy the argument (or null) into a slot of `slot_type`.
    #[inline]
    fn store(&self, value: &mut SimpleMapValue, index: usize, record: &dyn Record) {
        if self.slot_type() == ColumnType::Double {
            value.put_double(index, self.read_double(record).unwrap_or(f64::NAN));
        } else {
            value.put_long(index, self.read_long(record).unwrap_or(LONG_NULL));
        }
    }
}

#[inline]
fn non_null_long(v: i64) -> Option<i64> {
    (v != LONG_NULL).then_some(v)
}

#[inline]
fn non_null_double(v: f64) -> Option<f64> {
    (!v.is_nan()).then_some(v)
}

fn is_present(record: &dyn Record, column: usize, column_type: ColumnType) -> bool {
    match column_type {
        ColumnType::Boolean => record.get_bool(column).is_some(),
        ColumnType::Int => record.get_int(column).is_some(),
        ColumnType::Long => record.get_long(column).is_some(),
        ColumnType::Double => record.get_double(column).is_some(),
        ColumnType::Timestamp => record.get_timestamp(column).is_some(),
        ColumnType::Symbol | ColumnType::String => record.get_str(column).is_some(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountAll {
    value_index: usize,
}

impl CountAll {
    #[inline]
    fn compute_first(&self, value: &mut SimpleMapValue) {
        value.put_long(self.value_index, 1);
    }

    #[inline]
    fn compute_next(&self, value: &mut SimpleMapValue) {
        value.add_long(self.value_index, 1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountField {
    column: usize,
    column_type: ColumnType,
    value_index: usize,
}

impl CountField {
    fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        let n = is_present(record, self.column, self.column_type) as i64;
        value.put_long(self.value_index, n);
    }

    fn compute_next(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        if is_present(record, self.column, self.column_type) {
            value.add_long(self.value_index, 1);
        }
    }
}

/// SUM; integer arguments accumulate in a long slot, doubles in a double slot.
/// Integer sums saturate instead of wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    arg: NumericArg,
    value_index: usize,
}

impl Sum {
    fn is_integer(&self) -> bool {
        self.arg.arg_type.is_integer()
    }

    fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        if self.is_integer() {
            value.put_long(
                self.value_index,
                self.arg.read_long(record).unwrap_or(LONG_NULL),
            );
        } else {
            value.put_double(
                self.value_index,
                self.arg.read_double(record).unwrap_or(f64::NAN),
            );
        }
    }

    fn compute_next(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        if self.is_integer() {
            if let Some(v) = self.arg.read_long(record) {
                if value.get_long(self.value_index) == LONG_NULL {
                    value.put_long(self.value_index, v);
                } else {
                    value.saturating_add_long(self.value_index, v);
                }
            }
        } else if let Some(v) = self.arg.read_double(record) {
            if value.get_double(self.value_index).is_nan() {
                value.put_double(self.value_index, v);
            } else {
                value.add_double(self.value_index, v);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Avg {
    arg: NumericArg,
    sum_index: usize,
    count_index: usize,
}

impl Avg {
    fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        match self.arg.read_double(record) {
            Some(v) => {
                value.put_double(self.sum_index, v);
                value.put_long(self.count_index, 1);
            }
            None => {
                value.put_double(self.sum_index, 0.0);
                value.put_long(self.count_index, 0);
            }
        }
    }

    fn compute_next(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        if let Some(v) = self.arg.read_double(record) {
            value.add_double(self.sum_index, v);
            value.add_long(self.count_index, 1);
        }
    }

    fn average(&self, value: &SimpleMapValue) -> Option<f64> {
        match value.get_long(self.count_index) {
            0 => None,
            n => Some(value.get_double(self.sum_index) / n as f64),
        }
    }
}

/// MIN or MAX over a numeric argument; nulls are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMax {
    arg: NumericArg,
    value_index: usize,
    max: bool,
}

impl MinMax {
    fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        self.arg.store(value, self.value_index, record);
    }

    fn compute_next(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        if self.arg.slot_type() == ColumnType::Double {
            if let Some(v) = self.arg.read_double(record) {
                let current = value.get_double(self.value_index);
                if current.is_nan() || (self.max && v > current) || (!self.max && v < current) {
                    value.put_double(self.value_index, v);
                }
            }
        } else if let Some(v) = self.arg.read_long(record) {
            let current = value.get_long(self.value_index);
            if current == LONG_NULL || (self.max && v > current) || (!self.max && v < current) {
                value.put_long(self.value_index, v);
            }
        }
    }
}

/// FIRST or LAST value of the bucket, nulls included.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    arg: NumericArg,
    value_index: usize,
}

impl Pick {
    fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        self.arg.store(value, self.value_index, record);
    }
}

/// Aggregate function with state kept in a `SimpleMapValue`.
///
/// `compute_first` fully initializes every slot the function owns, so a
/// buffer can be reused across buckets without clearing it in between.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupByFunction {
    CountAll(CountAll),
    CountField(CountField),
    Sum(Sum),
    Avg(Avg),
    Min(MinMax),
    Max(MinMax),
    First(Pick),
    Last(Pick),
}

impl GroupByFunction {
    /// Resolve the aggregate against the input columns and reserve its state slots in `layout`.
    pub fn from_spec(
        spec: &AggregateOpSpec,
        metadata: &RecordMetadata,
        layout: &mut ValueLayout,
    ) -> Result<Self, SampleByError> {
        let resolve = |field: &str| -> Result<(usize, ColumnType), SampleByError> {
            let column = metadata
                .column_index(field)
                .ok_or_else(|| SampleByError::ColumnNotFound(field.to_string()))?;
            let column_type = metadata
                .column_type(column)
                .ok_or_else(|| SampleByError::ColumnNotFound(field.to_string()))?;
            Ok((column, column_type))
        };
        let numeric = |field: &str, allow_timestamp: bool| -> Result<NumericArg, SampleByError> {
            let (column, arg_type) = resolve(field)?;
            if !arg_type.is_numeric() || (!allow_timestamp && arg_type == ColumnType::Timestamp)
            {
                return Err(SampleByError::UnsupportedArgument {
                    function: spec.function_name(),
                    arg_type,
                });
            }
            Ok(NumericArg { column, arg_type })
        };

        let function = match spec {
            AggregateOpSpec::CountAll => GroupByFunction::CountAll(CountAll {
                value_index: layout.add(ColumnType::Long),
            }),
            AggregateOpSpec::CountField { field } => {
                let (column, column_type) = resolve(field)?;
                GroupByFunction::CountField(CountField {
                    column,
                    column_type,
                    value_index: layout.add(ColumnType::Long),
                })
            }
            AggregateOpSpec::Sum { field } => {
                let arg = numeric(field, false)?;
                let slot = if arg.arg_type.is_integer() {
                    ColumnType::Long
                } else {
                    ColumnType::Double
                };
                GroupByFunction::Sum(Sum {
                    arg,
                    value_index: layout.add(slot),
                })
            }
            AggregateOpSpec::Avg { field } => {
                let arg = numeric(field, false)?;
                GroupByFunction::Avg(Avg {
                    arg,
                    sum_index: layout.add(ColumnType::Double),
                    count_index: layout.add(ColumnType::Long),
                })
            }
            AggregateOpSpec::Min { field } | AggregateOpSpec::Max { field } => {
                let arg = numeric(field, true)?;
                let min_max = MinMax {
                    arg,
                    value_index: layout.add(arg.slot_type()),
                    max: matches!(spec, AggregateOpSpec::Max { .. }),
                };
                if min_max.max {
                    GroupByFunction::Max(min_max)
                } else {
                    GroupByFunction::Min(min_max)
                }
            }
            AggregateOpSpec::First { field } => {
                let arg = numeric(field, true)?;
                GroupByFunction::First(Pick {
                    arg,
                    value_index: layout.add(arg.slot_type()),
                })
            }
            AggregateOpSpec::Last { field } => {
                let arg = numeric(field, true)?;
                GroupByFunction::Last(Pick {
                    arg,
                    value_index: layout.add(arg.slot_type()),
                })
            }
        };
        Ok(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GroupByFunction::CountAll(_) | GroupByFunction::CountField(_) => "count",
            GroupByFunction::Sum(_) => "sum",
            GroupByFunction::Avg(_) => "avg",
            GroupByFunction::Min(_) => "min",
            GroupByFunction::Max(_) => "max",
            GroupByFunction::First(_) => "first",
            GroupByFunction::Last(_) => "last",
        }
    }

    /// Input column the function reads, if any.
    pub fn arg_column(&self) -> Option<usize> {
        match self {
            GroupByFunction::CountAll(_) => None,
            GroupByFunction::CountField(a) => Some(a.column),
            GroupByFunction::Sum(a) => Some(a.arg.column),
            GroupByFunction::Avg(a) => Some(a.arg.column),
            GroupByFunction::Min(a) | GroupByFunction::Max(a) => Some(a.arg.column),
            GroupByFunction::First(a) | GroupByFunction::Last(a) => Some(a.arg.column),
        }
    }

    pub fn output_type(&self) -> ColumnType {
        match self {
            GroupByFunction::CountAll(_) | GroupByFunction::CountField(_) => ColumnType::Long,
            GroupByFunction::Sum(a) if a.is_integer() => ColumnType::Long,
            GroupByFunction::Sum(_) | GroupByFunction::Avg(_) => ColumnType::Double,
            GroupByFunction::Min(a) | GroupByFunction::Max(a) => a.arg.slot_type(),
            GroupByFunction::First(a) | GroupByFunction::Last(a) => a.arg.slot_type(),
        }
    }

    /// Seed the state from the first row of a bucket.
    #[inline]
    pub fn compute_first(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        match self {
            GroupByFunction::CountAll(a) => a.compute_first(value),
            GroupByFunction::CountField(a) => a.compute_first(value, record),
            GroupByFunction::Sum(a) => a.compute_first(value, record),
            GroupByFunction::Avg(a) => a.compute_first(value, record),
            GroupByFunction::Min(a) | GroupByFunction::Max(a) => a.compute_first(value, record),
            GroupByFunction::First(a) | GroupByFunction::Last(a) => a.compute_first(value, record),
        }
    }

    /// Fold a subsequent row of the same bucket into the state.
    #[inline]
    pub fn compute_next(&self, value: &mut SimpleMapValue, record: &dyn Record) {
        match self {
            GroupByFunction::CountAll(a) => a.compute_next(value),
            GroupByFunction::CountField(a) => a.compute_next(value, record),
            GroupByFunction::Sum(a) => a.compute_next(value, record),
            GroupByFunction::Avg(a) => a.compute_next(value, record),
            GroupByFunction::Min(a) | GroupByFunction::Max(a) => a.compute_next(value, record),
            GroupByFunction::First(_) => {}
            GroupByFunction::Last(a) => a.arg.store(value, a.value_index, record),
        }
    }

    fn result_slot(&self) -> Option<usize> {
        match self {
            GroupByFunction::CountAll(a) => Some(a.value_index),
            GroupByFunction::CountField(a) => Some(a.value_index),
            GroupByFunction::Sum(a) => Some(a.value_index),
            GroupByFunction::Avg(_) => None,
            GroupByFunction::Min(a) | GroupByFunction::Max(a) => Some(a.value_index),
            GroupByFunction::First(a) | GroupByFunction::Last(a) => Some(a.value_index),
        }
    }

    pub fn get_long(&self, value: &SimpleMapValue) -> Option<i64> {
        match (self.output_type(), self.result_slot()) {
            (ColumnType::Long | ColumnType::Timestamp, Some(index)) => {
                non_null_long(value.get_long(index))
            }
            _ => None,
        }
    }

    pub fn get_double(&self, value: &SimpleMapValue) -> Option<f64> {
        if let GroupByFunction::Avg(a) = self {
            return a.average(value);
        }
        match (self.output_type(), self.result_slot()) {
            (ColumnType::Double, Some(index)) => non_null_double(value.get_double(index)),
            (_, Some(index)) => non_null_long(value.get_long(index)).map(|v| v as f64),
            (_, None) => None,
        }
    }

    pub fn get_timestamp(&self, value: &SimpleMapValue) -> Option<i64> {
        match (self.output_type(), self.result_slot()) {
            (ColumnType::Timestamp, Some(index)) => non_null_long(value.get_long(index)),
            _ => None,
        }
    }

    pub fn value(&self, value: &SimpleMapValue) -> ScalarValue {
        let scalar = match self.output_type() {
            ColumnType::Timestamp => self.get_timestamp(value).map(ScalarValue::Timestamp),
            ColumnType::Double => self.get_double(value).map(ScalarValue::Float64),
            _ => self.get_long(value).map(ScalarValue::Int64),
        };
        scalar.unwrap_or(ScalarValue::Null)
    }
}
