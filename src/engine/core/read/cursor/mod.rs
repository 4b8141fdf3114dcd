mod json_rows;
mod mem;
mod metadata;
mod symbol_table;

pub use mem::MemRecordCursor;
pub use metadata::{ColumnMeta, RecordMetadata};
pub use symbol_table::{MapSymbolTable, SymbolTable};

use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};

/// Read access to the row a cursor is currently positioned on.
///
/// Getters return `None` for nulls and for type mismatches.
pub trait Record {
    fn get_bool(&self, col: usize) -> Option<bool>;

    fn get_int(&self, col: usize) -> Option<i32>;

    fn get_long(&self, col: usize) -> Option<i64>;

    fn get_double(&self, col: usize) -> Option<f64>;

    fn get_timestamp(&self, col: usize) -> Option<i64>;

    fn get_str(&self, col: usize) -> Option<&str>;

    /// Dictionary key of a symbol column.
    fn get_symbol_key(&self, _col: usize) -> Option<i32> {
        None
    }

    /// Materialize a column as an owned scalar.
    fn value(&self, col: usize, column_type: ColumnType) -> ScalarValue {
        let value = match column_type {
            ColumnType::Boolean => self.get_bool(col).map(ScalarValue::Boolean),
            ColumnType::Int => self.get_int(col).map(|v| ScalarValue::Int64(v as i64)),
            ColumnType::Long => self.get_long(col).map(ScalarValue::Int64),
            ColumnType::Double => self.get_double(col).map(ScalarValue::Float64),
            ColumnType::Timestamp => self.get_timestamp(col).map(ScalarValue::Timestamp),
            ColumnType::Symbol | ColumnType::String => {
                self.get_str(col).map(|s| ScalarValue::Utf8(s.to_string()))
            }
        };
        value.unwrap_or(ScalarValue::Null)
    }
}

/// Pull-based, forward-only row source.
///
/// `record()` is only meaningful after `has_next()` returned true and stays
/// valid until the next call to `has_next()`.
pub trait RecordCursor: Send {
    fn has_next(&mut self) -> Result<bool, SampleByError>;

    fn record(&self) -> &dyn Record;

    /// Rewind to the first row.
    fn to_top(&mut self) -> Result<(), SampleByError>;

    fn symbol_table(&self, col: usize) -> Option<&dyn SymbolTable>;

    /// Number of rows this cursor will produce, if known up front.
    fn size(&self) -> Option<u64>;

    /// Release resources held by the cursor.
    fn close(&mut self);
}

/// Drain a cursor into owned rows laid out as described by `metadata`.
pub fn collect_rows(
    cursor: &mut dyn RecordCursor,
    metadata: &RecordMetadata,
) -> Result<Vec<Vec<ScalarValue>>, SampleByError> {
    let mut rows = Vec::new();
    while cursor.has_next()? {
        let record = cursor.record();
        let row = metadata
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| record.value(i, c.column_type))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
