//! Domain Events
//!
//! The core never renders notifications or chat messages itself; it
//! publishes events and lets the messaging/UI collaborators decide what
//! to show. Events fire after the state change has been persisted.

use chrono::NaiveDate;
use kernel::id::{BookingRequestId, ConversationId, MentorId, StudentId, TimeSlotId};
use serde::Serialize;

use crate::domain::value_object::booking_status::BookingStatus;

/// Events emitted by the scheduling core
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulingEvent {
    /// A booking request entered a new status (including `pending` on
    /// creation). The conversation id lets the messaging collaborator
    /// post a system message into the right thread.
    BookingStatusChanged {
        request_id: BookingRequestId,
        conversation_id: ConversationId,
        mentor_id: MentorId,
        student_id: StudentId,
        status: BookingStatus,
    },
    /// An occurrence's reservation counter moved
    SlotCapacityChanged {
        slot_id: TimeSlotId,
        mentor_id: MentorId,
        date: NaiveDate,
        reserved: u32,
        remaining: u32,
    },
}

/// Sink for scheduling events
///
/// Publishing must not fail the operation that triggered it - an
/// implementation with no listeners simply drops the event.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: SchedulingEvent);
}
