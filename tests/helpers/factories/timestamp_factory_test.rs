use super::TimestampFactory;

#[test]
fn builds_epoch_micros() {
    assert_eq!(TimestampFactory::utc_date(1970, 1, 1), 0);
    assert_eq!(TimestampFactory::hour(1970, 1, 1, 1), 3_600_000_000);
    assert_eq!(TimestampFactory::month(1970, 2), 31 * 86_400_000_000);
    assert_eq!(TimestampFactory::seconds(60), 60_000_000);
}
