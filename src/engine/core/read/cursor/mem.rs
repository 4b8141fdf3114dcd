use tracing::trace;

use super::json_rows;
use super::{MapSymbolTable, Record, RecordCursor, RecordMetadata, SymbolTable};
use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};
use std::io::BufRead;

/// Rewindable cursor over rows held in memory.
///
/// Symbol columns are stored dictionary-encoded; every symbol column owns a
/// `MapSymbolTable`.
#[derive(Debug, Clone)]
pub struct MemRecordCursor {
    metadata: RecordMetadata,
    record: MemRecord,
    next_row: usize,
}

#[derive(Debug, Clone)]
struct MemRecord {
    rows: Vec<Vec<ScalarValue>>,
    current: usize,
    symbols: Vec<Option<MapSymbolTable>>,
}

impl MemRecordCursor {
    pub fn new(metadata: RecordMetadata) -> Self {
        let symbols = metadata
            .columns()
            .iter()
            .map(|c| (c.column_type == ColumnType::Symbol).then(MapSymbolTable::new))
            .collect();
        Self {
            metadata,
            record: MemRecord {
                rows: Vec::new(),
                current: 0,
                symbols,
            },
            next_row: 0,
        }
    }

    /// Decode one JSON object per line; blank lines are skipped.
    pub fn from_json_lines<R: BufRead>(
        metadata: RecordMetadata,
        reader: R,
    ) -> Result<Self, SampleByError> {
        let mut cursor = Self::new(metadata);
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row = json_rows::decode_line(&cursor.metadata, &line, i + 1)?;
            cursor.push_row(row)?;
        }
        Ok(cursor)
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.record.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.rows.is_empty()
    }

    /// Append a row, coercing values to the column types.
    pub fn push_row(&mut self, row: Vec<ScalarValue>) -> Result<(), SampleByError> {
        if row.len() != self.metadata.column_count() {
            return Err(SampleByError::InvalidSchema(format!(
                "expected {} values, found {}",
                self.metadata.column_count(),
                row.len()
            )));
        }
        let mut stored = Vec::with_capacity(row.len());
        for (i, value) in row.into_iter().enumerate() {
            let meta = &self.metadata.columns()[i];
            let coerced = match (meta.column_type, value) {
                (_, ScalarValue::Null) => ScalarValue::Null,
                (ColumnType::Boolean, v @ ScalarValue::Boolean(_)) => v,
                (ColumnType::Int, ScalarValue::Int64(v)) if i32::try_from(v).is_ok() => {
                    ScalarValue::Int64(v)
                }
                (ColumnType::Long, v @ ScalarValue::Int64(_)) => v,
                (ColumnType::Double, v @ ScalarValue::Float64(_)) => v,
                (ColumnType::Double, ScalarValue::Int64(v)) => ScalarValue::Float64(v as f64),
                (ColumnType::Timestamp, v @ ScalarValue::Timestamp(_)) => v,
                (ColumnType::Timestamp, ScalarValue::Int64(v)) => ScalarValue::Timestamp(v),
                (ColumnType::Symbol, ScalarValue::Utf8(s)) => {
                    let table = self.record.symbols[i].get_or_insert_with(MapSymbolTable::new);
                    ScalarValue::Int64(table.intern(&s) as i64)
                }
                (ColumnType::String, v @ ScalarValue::Utf8(_)) => v,
                (column_type, other) => {
                    return Err(SampleByError::InvalidSchema(format!(
                        "value {other:?} does not fit {column_type} column {}",
                        meta.name
                    )));
                }
            };
            stored.push(coerced);
        }
        self.record.rows.push(stored);
        Ok(())
    }

    /// Stable sort by the designated timestamp; nulls first.
    pub fn sort_by_timestamp(&mut self) {
        if let Some(ts) = self.metadata.timestamp_index() {
            self.sort_by_column(ts);
        }
    }

    /// Stable sort by the integer value of column `col`; nulls first.
    pub fn sort_by_column(&mut self, col: usize) {
        self.record
            .rows
            .sort_by_key(|row| row.get(col).and_then(ScalarValue::as_i64));
        self.next_row = 0;
    }
}

impl MemRecord {
    fn cell(&self, col: usize) -> Option<&ScalarValue> {
        self.rows.get(self.current).and_then(|row| row.get(col))
    }
}

impl Record for MemRecord {
    fn get_bool(&self, col: usize) -> Option<bool> {
        self.cell(col).and_then(ScalarValue::as_bool)
    }

    fn get_int(&self, col: usize) -> Option<i32> {
        match self.cell(col) {
            Some(ScalarValue::Int64(v)) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    fn get_long(&self, col: usize) -> Option<i64> {
        self.cell(col).and_then(ScalarValue::as_i64)
    }

    fn get_double(&self, col: usize) -> Option<f64> {
        self.cell(col).and_then(ScalarValue::as_f64)
    }

    fn get_timestamp(&self, col: usize) -> Option<i64> {
        self.cell(col).and_then(ScalarValue::as_i64)
    }

    fn get_str(&self, col: usize) -> Option<&str> {
        match (self.cell(col)?, self.symbols.get(col)) {
            (ScalarValue::Utf8(s), _) => Some(s.as_str()),
            (ScalarValue::Int64(key), Some(Some(table))) => table.value_of(*key as i32),
            _ => None,
        }
    }

    fn get_symbol_key(&self, col: usize) -> Option<i32> {
        match (self.cell(col)?, self.symbols.get(col)) {
            (ScalarValue::Int64(key), Some(Some(_))) => Some(*key as i32),
            _ => None,
        }
    }
}

impl RecordCursor for MemRecordCursor {
    fn has_next(&mut self) -> Result<bool, SampleByError> {
        if self.next_row < self.record.rows.len() {
            self.record.current = self.next_row;
            self.next_row += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn record(&self) -> &dyn Record {
        &self.record
    }

    fn to_top(&mut self) -> Result<(), SampleByError> {
        self.next_row = 0;
        self.record.current = 0;
        Ok(())
    }

    fn symbol_table(&self, col: usize) -> Option<&dyn SymbolTable> {
        self.record
            .symbols
            .get(col)
            .and_then(Option::as_ref)
            .map(|t| t as &dyn SymbolTable)
    }

    fn size(&self) -> Option<u64> {
        Some(self.record.rows.len() as u64)
    }

    fn close(&mut self) {
        trace!(
            target: "sample_by::mem_cursor",
            rows = self.record.rows.len(),
            "Closing in-memory cursor"
        );
        self.next_row = self.record.rows.len();
    }
}
