//! Broadcast Event Publisher
//!
//! Fans scheduling events out on a tokio broadcast channel so the
//! messaging, notification, and UI collaborators can each hold their
//! own subscription. Publishing never fails the operation that raised
//! the event.

use tokio::sync::broadcast;

use crate::domain::event::{EventPublisher, SchedulingEvent};

/// Default channel capacity; slow subscribers past this start lagging
const DEFAULT_CAPACITY: usize = 256;

/// Broadcast-backed event publisher
#[derive(Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<SchedulingEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription; events published afterwards are
    /// delivered to it
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulingEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: SchedulingEvent) {
        // Err means no live subscribers, which is fine
        if self.sender.send(event).is_err() {
            tracing::debug!("Scheduling event dropped: no subscribers");
        }
    }
}

/// Publisher that drops every event
///
/// For callers that do not observe events, e.g. one-shot maintenance
/// scripts and most tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _event: SchedulingEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::{BookingRequestId, ConversationId, MentorId, StudentId};

    use crate::domain::value_object::booking_status::BookingStatus;

    fn event() -> SchedulingEvent {
        SchedulingEvent::BookingStatusChanged {
            request_id: BookingRequestId::new(),
            conversation_id: ConversationId::new(),
            mentor_id: MentorId::new(),
            student_id: StudentId::new(),
            status: BookingStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let publisher = BroadcastPublisher::default();
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();

        publisher.publish(event());

        assert!(matches!(
            first.recv().await.unwrap(),
            SchedulingEvent::BookingStatusChanged { .. }
        ));
        assert!(matches!(
            second.recv().await.unwrap(),
            SchedulingEvent::BookingStatusChanged { .. }
        ));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = BroadcastPublisher::default();
        publisher.publish(event());

        NullPublisher.publish(event());
    }
}
