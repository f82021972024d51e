use crate::record::{RawRecord, sort_by_timestamp};
use pretty_assertions::assert_eq;

fn keys(records: &[RawRecord]) -> Vec<&str> {
    records.iter().map(|r| r.key.as_str()).collect()
}

#[test]
fn sorts_ascending_by_timestamp() {
    // Arrange
    let mut records = vec![
        RawRecord::new("t", "c", "").with_timestamp(30),
        RawRecord::new("t", "a", "").with_timestamp(10),
        RawRecord::new("t", "b", "").with_timestamp(20),
    ];

    // Act
    sort_by_timestamp(&mut records);

    // Assert
    assert_eq!(keys(&records), vec!["a", "b", "c"]);
}

#[test]
fn equal_timestamps_keep_arrival_order() {
    let mut records = vec![
        RawRecord::new("t", "second", "").with_timestamp(5),
        RawRecord::new("t", "first", "").with_timestamp(1),
        RawRecord::new("t", "third", "").with_timestamp(5),
    ];

    sort_by_timestamp(&mut records);

    assert_eq!(keys(&records), vec!["first", "second", "third"]);
}

#[test]
fn records_without_timestamp_stay_in_place() {
    // Arrange
    let mut records = vec![
        RawRecord::new("t", "late", "").with_timestamp(9),
        RawRecord::new("t", "untimed", ""),
        RawRecord::new("t", "early", "").with_timestamp(1),
    ];

    // Act
    sort_by_timestamp(&mut records);

    // Assert
    assert_eq!(keys(&records), vec!["early", "untimed", "late"]);
}
