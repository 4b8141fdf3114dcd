use crate::engine::core::read::cursor::{MemRecordCursor, RecordMetadata};
use crate::engine::types::ScalarValue;

/// Builds in-memory input cursors. Default schema:
/// `ts:timestamp, price:double, qty:long, sym:symbol`.
pub struct MemCursorFactory {
    schema: String,
    rows: Vec<Vec<ScalarValue>>,
}

impl MemCursorFactory {
    pub fn new() -> Self {
        Self {
            schema: "ts:timestamp,price:double,qty:long,sym:symbol".to_string(),
            rows: Vec::new(),
        }
    }

    /// Replace the schema; rows added afterwards must match it.
    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    pub fn with_row(mut self, row: Vec<ScalarValue>) -> Self {
        self.rows.push(row);
        self
    }

    /// One row on the default schema.
    pub fn with_tick(self, ts: i64, price: f64, qty: i64) -> Self {
        let sym = if qty % 2 == 0 { "even" } else { "odd" };
        self.with_row(vec![
            ScalarValue::Timestamp(ts),
            ScalarValue::Float64(price),
            ScalarValue::Int64(qty),
            ScalarValue::Utf8(sym.to_string()),
        ])
    }

    /// Rows at the given timestamps on the default schema; the i-th row has
    /// price `i + 1` and qty `i + 1`.
    pub fn with_ticks(self, timestamps: &[i64]) -> Self {
        timestamps
            .iter()
            .enumerate()
            .fold(self, |f, (i, ts)| f.with_tick(*ts, (i + 1) as f64, (i + 1) as i64))
    }

    pub fn metadata(&self) -> RecordMetadata {
        RecordMetadata::parse_schema(&self.schema).unwrap()
    }

    pub fn create(self) -> MemRecordCursor {
        let mut cursor = MemRecordCursor::new(self.metadata());
        for row in self.rows {
            cursor.push_row(row).unwrap();
        }
        cursor
    }
}
