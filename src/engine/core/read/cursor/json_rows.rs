use serde_json::Value;

use super::RecordMetadata;
use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};
use crate::shared::time::TimeParser;

/// Decode a single JSON object into a row laid out as `metadata`.
/// Missing fields and JSON nulls become `ScalarValue::Null`.
pub(crate) fn decode_line(
    metadata: &RecordMetadata,
    line: &str,
    line_no: usize,
) -> Result<Vec<ScalarValue>, SampleByError> {
    let parsed: Value = serde_json::from_str(line).map_err(|e| SampleByError::RowDecode {
        line: line_no,
        reason: e.to_string(),
    })?;
    let Value::Object(fields) = parsed else {
        return Err(SampleByError::RowDecode {
            line: line_no,
            reason: "expected a JSON object".to_string(),
        });
    };

    metadata
        .columns()
        .iter()
        .map(|column| {
            let value = fields.get(&column.name).unwrap_or(&Value::Null);
            decode_value(value, column.column_type).ok_or_else(|| SampleByError::RowDecode {
                line: line_no,
                reason: format!(
                    "field {} holds {} which is not a valid {}",
                    column.name, value, column.column_type
                ),
            })
        })
        .collect()
}

fn decode_value(value: &Value, column_type: ColumnType) -> Option<ScalarValue> {
    if value.is_null() {
        return Some(ScalarValue::Null);
    }
    match column_type {
        ColumnType::Boolean => value.as_bool().map(ScalarValue::Boolean),
        ColumnType::Int | ColumnType::Long => value.as_i64().map(ScalarValue::Int64),
        ColumnType::Double => value.as_f64().map(ScalarValue::Float64),
        ColumnType::Timestamp => match value {
            Value::Number(n) => n.as_i64().map(ScalarValue::Timestamp),
            Value::String(s) => TimeParser::parse_str_to_micros(s).map(ScalarValue::Timestamp),
            _ => None,
        },
        ColumnType::Symbol | ColumnType::String => match value {
            Value::String(s) => Some(ScalarValue::Utf8(s.clone())),
            Value::Number(n) => Some(ScalarValue::Utf8(n.to_string())),
            Value::Bool(b) => Some(ScalarValue::Utf8(b.to_string())),
            _ => None,
        },
    }
}
