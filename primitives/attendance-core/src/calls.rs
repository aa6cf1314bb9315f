use crate::model::{Call, FeedEvent};

/// Keeps the ended calls, numbering them by their position among the kept calls.
pub fn select_ended_calls(events: Vec<FeedEvent>) -> Vec<Call> {
    events
        .into_iter()
        .filter(FeedEvent::is_ended_call)
        .enumerate()
        .map(|(index, event)| Call {
            index,
            id: event.id,
            timestamp: event.timestamp,
            participants: event.rtc.and_then(|rtc| rtc.participants),
        })
        .collect()
}
