use crate::record::Payload;

/// One ingested unit. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub topic: String,
    pub key: String,
    /// Value exactly as received.
    pub value: String,
    pub payload: Payload,
    pub partition: Option<i64>,
    pub offset: Option<i64>,
    /// Epoch milliseconds.
    pub timestamp: Option<i64>,
}

impl RawRecord {
    pub fn new(topic: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            topic: topic.into(),
            key: key.into(),
            payload: Payload::parse(&value),
            value,
            partition: None,
            offset: None,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Reorder a batch into causal order.
///
/// Timestamped records are stably sorted among the slots they occupy, so
/// records without a timestamp keep their arrival position.
pub fn sort_by_timestamp(records: &mut [RawRecord]) {
    let slots: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.timestamp.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut stamped: Vec<RawRecord> = slots
        .iter()
        .map(|&i| std::mem::take(&mut records[i]))
        .collect();
    stamped.sort_by_key(|r| r.timestamp);

    for (slot, record) in slots.into_iter().zip(stamped) {
        records[slot] = record;
    }
}
