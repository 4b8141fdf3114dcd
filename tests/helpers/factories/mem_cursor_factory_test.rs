use super::MemCursorFactory;
use crate::engine::core::read::cursor::RecordCursor;

#[test]
fn ticks_number_rows_from_one() {
    let mut cursor = MemCursorFactory::new().with_ticks(&[5, 9]).create();
    assert!(cursor.has_next().unwrap());
    assert_eq!(cursor.record().get_timestamp(0), Some(5));
    assert_eq!(cursor.record().get_double(1), Some(1.0));
    assert_eq!(cursor.record().get_str(3), Some("odd"));
    assert!(cursor.has_next().unwrap());
    assert_eq!(cursor.record().get_long(2), Some(2));
    assert_eq!(cursor.record().get_str(3), Some("even"));
    assert!(!cursor.has_next().unwrap());
}

#[test]
fn custom_schema_is_respected() {
    let factory = MemCursorFactory::new().with_schema("t:timestamp,v:int");
    let metadata = factory.metadata();
    assert_eq!(metadata.column_count(), 2);
    assert_eq!(metadata.timestamp_index(), Some(0));
}
