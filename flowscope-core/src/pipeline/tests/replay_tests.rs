use crate::pipeline::{DEFAULT_REPLAY_CAPACITY, ReplayLog, VisualEvent};
use pretty_assertions::assert_eq;

#[test]
fn ring_keeps_the_most_recent_entries_in_order() {
    // Arrange
    let mut log = ReplayLog::default();

    // Act
    for i in 0..250 {
        log.push(VisualEvent::log(format!("e{i}")));
    }

    // Assert
    assert_eq!(log.len(), DEFAULT_REPLAY_CAPACITY);
    let texts: Vec<_> = log.iter().filter_map(|e| e.text.clone()).collect();
    let expected: Vec<_> = (150..250).map(|i| format!("e{i}")).collect();
    assert_eq!(texts, expected);
}

#[test]
fn snapshot_is_one_batch_per_slot() {
    let mut log = ReplayLog::new(3);
    log.push(VisualEvent::log("a"));
    log.push(VisualEvent::log("b"));

    let snapshot = log.snapshot();

    assert_eq!(
        snapshot,
        vec![vec![VisualEvent::log("a")], vec![VisualEvent::log("b")]]
    );
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut log = ReplayLog::new(0);

    log.push(VisualEvent::log("a"));
    log.push(VisualEvent::log("b"));

    assert_eq!(log.capacity(), 1);
    assert_eq!(log.len(), 1);
}

#[test]
fn clear_empties_the_ring() {
    let mut log = ReplayLog::new(4);
    log.push(VisualEvent::log("a"));

    log.clear();

    assert!(log.is_empty());
}
