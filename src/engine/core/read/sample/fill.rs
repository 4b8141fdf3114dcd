use super::record::RecordFunction;
use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};
use crate::shared::time::TimeParser;

const UNSUPPORTED_MODES: [&str; 3] = ["prev", "linear", "none"];

/// Build one constant filler per aggregate output column.
///
/// A single fill value is applied to every column; otherwise there must be
/// exactly one value per column.
pub fn placeholder_functions(
    fill_values: &[String],
    output_types: &[ColumnType],
) -> Result<Vec<RecordFunction>, SampleByError> {
    if fill_values.len() != 1 && fill_values.len() != output_types.len() {
        return Err(SampleByError::FillValueCount {
            expected: output_types.len(),
            found: fill_values.len(),
        });
    }

    output_types
        .iter()
        .enumerate()
        .map(|(i, column_type)| {
            let raw = if fill_values.len() == 1 {
                &fill_values[0]
            } else {
                &fill_values[i]
            };
            let value = parse_fill_value(raw, *column_type)?;
            Ok(RecordFunction::constant(value, *column_type))
        })
        .collect()
}

/// Fill literals for a query that names none: `default` for integer and
/// double columns, null for everything else.
pub fn default_fill_values(default: &str, output_types: &[ColumnType]) -> Vec<String> {
    output_types
        .iter()
        .map(|t| match t {
            ColumnType::Int | ColumnType::Long | ColumnType::Double => default.to_string(),
            _ => "null".to_string(),
        })
        .collect()
}

/// Parse one fill literal into a value of `column_type`.
pub fn parse_fill_value(raw: &str, column_type: ColumnType) -> Result<ScalarValue, SampleByError> {
    let literal = raw.trim();
    let lowered = literal.to_ascii_lowercase();
    if lowered == "null" {
        return Ok(ScalarValue::Null);
    }
    if UNSUPPORTED_MODES.contains(&lowered.as_str()) {
        return Err(SampleByError::UnsupportedFill(lowered));
    }

    let invalid = || SampleByError::InvalidFillValue {
        value: raw.to_string(),
        column_type,
    };

    match column_type {
        ColumnType::Int | ColumnType::Long => parse_integer(literal)
            .map(ScalarValue::Int64)
            .ok_or_else(invalid),
        ColumnType::Double => literal
            .parse::<f64>()
            .map(ScalarValue::Float64)
            .map_err(|_| invalid()),
        ColumnType::Timestamp => TimeParser::parse_str_to_micros(literal)
            .map(ScalarValue::Timestamp)
            .ok_or_else(invalid),
        ColumnType::Boolean => match lowered.as_str() {
            "true" => Ok(ScalarValue::Boolean(true)),
            "false" => Ok(ScalarValue::Boolean(false)),
            _ => Err(invalid()),
        },
        ColumnType::Symbol | ColumnType::String => Ok(ScalarValue::Utf8(literal.to_string())),
    }
}

/// Integers, or whole-valued decimals such as `0.0`.
fn parse_integer(literal: &str) -> Option<i64> {
    if let Ok(v) = literal.parse::<i64>() {
        return Some(v);
    }
    let v = literal.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}
