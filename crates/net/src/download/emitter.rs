//! Per-invocation event emitter

use sigdown_events::{EventEmitter, EventSender};

/// Event emitter that stamps every event of one download with the same
/// correlation id
#[derive(Debug, Clone)]
pub(super) struct InvocationEvents {
    sender: Option<EventSender>,
    correlation_id: String,
}

impl InvocationEvents {
    pub(super) fn new(sender: Option<EventSender>) -> Self {
        Self {
            sender,
            correlation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl EventEmitter for InvocationEvents {
    fn event_sender(&self) -> Option<&EventSender> {
        self.sender.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        Some(&self.correlation_id)
    }
}
