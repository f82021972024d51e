use crate::pipeline::VisualEvent;
use std::collections::VecDeque;

/// FIFO of aggregated events awaiting playback.
///
/// Only the front is popped; aggregation may mutate any entry in place.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    entries: VecDeque<VisualEvent>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, event: VisualEvent) {
        self.entries.push_back(event);
    }

    pub fn pop_front(&mut self) -> Option<VisualEvent> {
        self.entries.pop_front()
    }

    pub fn back_mut(&mut self) -> Option<&mut VisualEvent> {
        self.entries.back_mut()
    }

    /// The most recently appended entry satisfying `pred`.
    pub fn find_last_mut(
        &mut self,
        pred: impl Fn(&VisualEvent) -> bool,
    ) -> Option<&mut VisualEvent> {
        self.entries.iter_mut().rev().find(|e| pred(e))
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

    pub fn iter(&self) -> impl Iterator<Item = &VisualEvent> {
        self.entries.iter()
    }
}
