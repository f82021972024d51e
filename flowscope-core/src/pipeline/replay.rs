use crate::pipeline::VisualEvent;
use std::collections::VecDeque;

pub const DEFAULT_REPLAY_CAPACITY: usize = 100;

/// Bounded ring of events dequeued in live mode. The oldest entry is evicted
/// first once capacity is reached.
#[derive(Debug, Clone)]
pub struct ReplayLog {
    capacity: usize,
    entries: VecDeque<VisualEvent>,
}

impl ReplayLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: VisualEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Freeze the log as replay steps: one single-event batch per slot.
    pub fn snapshot(&self) -> Vec<Vec<VisualEvent>> {
        self.entries.iter().map(|e| vec![e.clone()]).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualEvent> {
        self.entries.iter()
    }
}

impl Default for ReplayLog {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_CAPACITY)
    }
}
