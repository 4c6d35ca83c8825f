//! Cancel Booking Use Case
//!
//! Either party can back out of a pending or accepted booking. An
//! accepted booking gives its seat back. The core only records the
//! cancellation; whether the student is refunded is decided by the
//! payment collaborator from the mentor's cancellation policy.

use std::sync::Arc;

use kernel::id::{BookingRequestId, MentorId, StudentId};
use platform::sync::KeyedMutex;

use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::event::{EventPublisher, SchedulingEvent};
use crate::domain::repository::{BookingRequestRepository, TimeSlotRepository};
use crate::error::{SchedulingError, SchedulingResult};

/// Who is cancelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledBy {
    Mentor(MentorId),
    Student(StudentId),
}

/// Cancel booking use case
pub struct CancelBookingUseCase<B, S, P>
where
    B: BookingRequestRepository,
    S: TimeSlotRepository,
    P: EventPublisher,
{
    booking_repo: Arc<B>,
    slot_repo: Arc<S>,
    publisher: Arc<P>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<B, S, P> CancelBookingUseCase<B, S, P>
where
    B: BookingRequestRepository,
    S: TimeSlotRepository,
    P: EventPublisher,
{
    pub fn new(
        booking_repo: Arc<B>,
        slot_repo: Arc<S>,
        publisher: Arc<P>,
        mentor_gate: Arc<KeyedMutex<MentorId>>,
    ) -> Self {
        Self {
            booking_repo,
            slot_repo,
            publisher,
            mentor_gate,
        }
    }

    pub async fn execute(
        &self,
        caller: CancelledBy,
        request_id: BookingRequestId,
    ) -> SchedulingResult<BookingRequest> {
        // The request names the mentor whose gate serializes this write,
        // so peek first, then re-read under the gate
        let mentor_id = self
            .booking_repo
            .find_by_id(&request_id)
            .await?
            .ok_or(SchedulingError::BookingNotFound(request_id))?
            .mentor_id;
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut request = self
            .booking_repo
            .find_by_id(&request_id)
            .await?
            .ok_or(SchedulingError::BookingNotFound(request_id))?;

        let is_participant = match caller {
            CancelledBy::Mentor(id) => request.mentor_id == id,
            CancelledBy::Student(id) => request.student_id == id,
        };
        if !is_participant {
            return Err(SchedulingError::BookingNotFound(request_id));
        }

        let released = request.cancel()?;
        self.booking_repo.update(&request).await?;

        if let Some((slot_id, date)) = released {
            let slot = self.slot_repo.release(&slot_id, date).await?;
            self.publisher.publish(SchedulingEvent::SlotCapacityChanged {
                slot_id,
                mentor_id: request.mentor_id,
                date,
                reserved: slot.reserved_on(date),
                remaining: slot.remaining_on(date),
            });
        }

        self.publisher.publish(SchedulingEvent::BookingStatusChanged {
            request_id: request.id,
            conversation_id: request.conversation_id,
            mentor_id: request.mentor_id,
            student_id: request.student_id,
            status: request.status,
        });

        tracing::info!(
            request_id = %request.id,
            mentor_id = %request.mentor_id,
            by_mentor = matches!(caller, CancelledBy::Mentor(_)),
            "Booking request cancelled"
        );
        Ok(request)
    }
}
