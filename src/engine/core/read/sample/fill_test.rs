use super::fill::{default_fill_values, parse_fill_value, placeholder_functions};
use super::record::RecordFunction;
use crate::engine::errors::SampleByError;
use crate::engine::types::{ColumnType, ScalarValue};
use crate::test_helpers::factories::TimestampFactory;

fn values(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|v| v.to_string()).collect()
}

fn constant_value(function: &RecordFunction) -> &ScalarValue {
    match function {
        RecordFunction::Constant { value, .. } => value,
        other => panic!("expected constant, got {other:?}"),
    }
}

#[test]
fn single_value_is_broadcast_and_cast_per_column() {
    let functions = placeholder_functions(
        &values(&["0"]),
        &[ColumnType::Long, ColumnType::Double],
    )
    .unwrap();

    assert_eq!(functions.len(), 2);
    assert_eq!(constant_value(&functions[0]), &ScalarValue::Int64(0));
    assert_eq!(constant_value(&functions[1]), &ScalarValue::Float64(0.0));
    assert_eq!(functions[1].column_type(), ColumnType::Double);
}

#[test]
fn one_value_per_column() {
    let functions = placeholder_functions(
        &values(&["null", "1.5", "-3"]),
        &[ColumnType::Double, ColumnType::Double, ColumnType::Long],
    )
    .unwrap();

    assert_eq!(constant_value(&functions[0]), &ScalarValue::Null);
    assert_eq!(constant_value(&functions[1]), &ScalarValue::Float64(1.5));
    assert_eq!(constant_value(&functions[2]), &ScalarValue::Int64(-3));
}

#[test]
fn count_mismatch_is_rejected() {
    let result = placeholder_functions(
        &values(&["0", "1"]),
        &[ColumnType::Long, ColumnType::Long, ColumnType::Long],
    );
    assert!(matches!(
        result,
        Err(SampleByError::FillValueCount {
            expected: 3,
            found: 2
        })
    ));
}

#[test]
fn interpolating_modes_are_unsupported() {
    for mode in ["prev", "LINEAR", "none"] {
        assert!(
            matches!(
                parse_fill_value(mode, ColumnType::Double),
                Err(SampleByError::UnsupportedFill(_))
            ),
            "{mode} should be rejected"
        );
    }
}

#[test]
fn literals_must_match_column_type() {
    let test_cases = vec![
        // (literal, column type, accepted)
        ("abc", ColumnType::Double, false),
        ("1.5", ColumnType::Long, false),
        ("2.0", ColumnType::Long, true),
        ("NULL", ColumnType::Long, true),
        ("yes", ColumnType::Boolean, false),
        ("true", ColumnType::Boolean, true),
    ];
    for (literal, column_type, accepted) in test_cases {
        let result = parse_fill_value(literal, column_type);
        assert_eq!(result.is_ok(), accepted, "{literal} as {column_type}");
        if !accepted {
            assert!(matches!(
                result,
                Err(SampleByError::InvalidFillValue { .. })
            ));
        }
    }
}

#[test]
fn timestamp_fill_accepts_micros_and_rfc3339() {
    assert_eq!(
        parse_fill_value("1000", ColumnType::Timestamp).unwrap(),
        ScalarValue::Timestamp(1000)
    );
    assert_eq!(
        parse_fill_value("2024-01-15T00:00:00Z", ColumnType::Timestamp).unwrap(),
        ScalarValue::Timestamp(TimestampFactory::utc_date(2024, 1, 15))
    );
}

#[test]
fn default_fill_applies_to_integer_and_double_columns_only() {
    let types = [
        ColumnType::Long,
        ColumnType::Int,
        ColumnType::Double,
        ColumnType::Timestamp,
        ColumnType::Symbol,
    ];
    assert_eq!(
        default_fill_values("0", &types),
        values(&["0", "0", "0", "null", "null"])
    );

    let functions = placeholder_functions(&default_fill_values("0", &types), &types).unwrap();
    assert_eq!(constant_value(&functions[0]), &ScalarValue::Int64(0));
    assert_eq!(constant_value(&functions[2]), &ScalarValue::Float64(0.0));
    assert_eq!(constant_value(&functions[3]), &ScalarValue::Null);
}
