use super::record::{RecordFunction, RecordView, SharedTimestamp, SplitRecord};
use crate::engine::core::read::aggregate::{
    AggregateOpSpec, GroupByFunction, SimpleMapValue, ValueLayout,
};
use crate::engine::core::read::cursor::{Record, RecordCursor};
use crate::engine::types::{ColumnType, ScalarValue};
use crate::test_helpers::factory::Factory;

fn sum_price() -> (GroupByFunction, ValueLayout) {
    let metadata = Factory::mem_cursor().metadata();
    let mut layout = ValueLayout::new();
    let spec: AggregateOpSpec = "sum(price)".parse().unwrap();
    let function = GroupByFunction::from_spec(&spec, &metadata, &mut layout).unwrap();
    (function, layout)
}

#[test]
fn shared_timestamp_is_visible_through_clones() {
    let ts = SharedTimestamp::new();
    let reader = ts.clone();
    ts.set(42);
    assert_eq!(reader.get(), 42);
    assert_eq!(ts, reader);
    assert_ne!(ts, SharedTimestamp::new());
}

#[test]
fn views_switch_without_touching_state() {
    let (function, layout) = sum_price();
    let ts = SharedTimestamp::new();
    ts.set(120);

    let mut input = Factory::mem_cursor().with_tick(5, 2.5, 1).create();
    assert!(input.has_next().unwrap());

    let mut record = SplitRecord::new(
        vec![
            RecordFunction::Timestamp(ts.clone()),
            RecordFunction::Aggregate(function.clone()),
        ],
        vec![
            RecordFunction::Timestamp(ts.clone()),
            RecordFunction::constant(ScalarValue::Float64(-1.0), ColumnType::Double),
        ],
        SimpleMapValue::new(&layout),
    );
    function.compute_first(record.value_mut(), input.record());

    assert_eq!(record.active(), RecordView::Real);
    assert_eq!(record.get_timestamp(0), Some(120));
    assert_eq!(record.get_double(1), Some(2.5));

    record.set_active(RecordView::Filler);
    assert_eq!(record.get_timestamp(0), Some(120));
    assert_eq!(record.get_double(1), Some(-1.0));

    record.set_active(RecordView::Real);
    assert_eq!(record.get_double(1), Some(2.5));
}

#[test]
fn constants_expose_typed_getters() {
    let layout = ValueLayout::new();
    let record = SplitRecord::new(
        vec![
            RecordFunction::constant(ScalarValue::Int64(7), ColumnType::Long),
            RecordFunction::constant(ScalarValue::Null, ColumnType::Double),
            RecordFunction::constant(ScalarValue::Boolean(true), ColumnType::Boolean),
            RecordFunction::constant(ScalarValue::Utf8("n/a".into()), ColumnType::String),
        ],
        vec![
            RecordFunction::constant(ScalarValue::Null, ColumnType::Long),
            RecordFunction::constant(ScalarValue::Null, ColumnType::Double),
            RecordFunction::constant(ScalarValue::Null, ColumnType::Boolean),
            RecordFunction::constant(ScalarValue::Null, ColumnType::String),
        ],
        SimpleMapValue::new(&layout),
    );

    assert_eq!(record.column_count(), 4);
    assert_eq!(record.get_long(0), Some(7));
    assert_eq!(record.get_int(0), Some(7));
    assert_eq!(record.get_double(0), Some(7.0));
    assert_eq!(record.get_double(1), None);
    assert_eq!(record.get_bool(2), Some(true));
    assert_eq!(record.get_str(3), Some("n/a"));
    assert_eq!(record.value(1, ColumnType::Double), ScalarValue::Null);
    assert_eq!(record.get_long(9), None);
}

#[test]
fn record_function_reports_column_type() {
    let (function, _) = sum_price();
    assert_eq!(
        RecordFunction::Aggregate(function).column_type(),
        ColumnType::Double
    );
    assert_eq!(
        RecordFunction::Timestamp(SharedTimestamp::new()).column_type(),
        ColumnType::Timestamp
    );
    assert_eq!(
        RecordFunction::constant(ScalarValue::Null, ColumnType::Long).column_type(),
        ColumnType::Long
    );
}
