use crate::pipeline::{EventType, PendingQueue, VisualEvent};

/// Fold one event into the pending queue.
///
/// - Aggregating messages coalesce into the latest queued message on the same
///   edge with the same correlation id, wherever it sits in the queue. An
///   event without an id only matches entries without one.
/// - Aggregating logs coalesce only into the tail entry, and only when that
///   entry is itself a log.
/// - Everything else is appended.
///
/// A coalesced entry keeps its position; its `count` grows and the new text is
/// appended to its `logs`.
pub fn fold(event: VisualEvent, queue: &mut PendingQueue) {
    if !event.aggregate {
        append(event, queue);
        return;
    }

    let target = match event.event_type {
        EventType::Message => queue.find_last_mut(|queued| same_edge(queued, &event)),
        EventType::Log => queue
            .back_mut()
            .filter(|tail| tail.event_type == EventType::Log),
    };

    match target {
        Some(existing) => {
            existing.count = existing.count.saturating_add(1);
            if let Some(line) = event.log_line() {
                existing.logs.push(line);
            }
        }
        None => append(event, queue),
    }
}

fn same_edge(queued: &VisualEvent, event: &VisualEvent) -> bool {
    queued.is_message()
        && queued.aggregate
        && queued.source_id == event.source_id
        && queued.target_id == event.target_id
        && queued.fsm_id == event.fsm_id
}

fn append(mut event: VisualEvent, queue: &mut PendingQueue) {
    // Seed the collection of logs with the event's own text.
    if event.logs.is_empty() {
        event.logs.extend(event.log_line());
    }
    queue.push_back(event);
}
