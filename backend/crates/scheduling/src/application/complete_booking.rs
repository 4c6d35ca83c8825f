//! Complete Booking Use Case
//!
//! Marks an accepted booking as completed once the session has ended.
//! The core runs no timers; a caller polls or schedules this against
//! the injected clock.

use std::sync::Arc;

use kernel::id::{BookingRequestId, MentorId};
use platform::clock::Clock;
use platform::sync::KeyedMutex;

use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::event::{EventPublisher, SchedulingEvent};
use crate::domain::repository::BookingRequestRepository;
use crate::error::{SchedulingError, SchedulingResult};

/// Complete booking use case
pub struct CompleteBookingUseCase<B, C, P>
where
    B: BookingRequestRepository,
    C: Clock,
    P: EventPublisher,
{
    booking_repo: Arc<B>,
    clock: Arc<C>,
    publisher: Arc<P>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<B, C, P> CompleteBookingUseCase<B, C, P>
where
    B: BookingRequestRepository,
    C: Clock,
    P: EventPublisher,
{
    pub fn new(
        booking_repo: Arc<B>,
        clock: Arc<C>,
        publisher: Arc<P>,
        mentor_gate: Arc<KeyedMutex<MentorId>>,
    ) -> Self {
        Self {
            booking_repo,
            clock,
            publisher,
            mentor_gate,
        }
    }

    pub async fn execute(
        &self,
        mentor_id: MentorId,
        request_id: BookingRequestId,
    ) -> SchedulingResult<BookingRequest> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut request = self
            .booking_repo
            .find_by_id(&request_id)
            .await?
            .filter(|request| request.mentor_id == mentor_id)
            .ok_or(SchedulingError::BookingNotFound(request_id))?;

        request.complete(self.clock.now())?;
        self.booking_repo.update(&request).await?;

        self.publisher.publish(SchedulingEvent::BookingStatusChanged {
            request_id: request.id,
            conversation_id: request.conversation_id,
            mentor_id: request.mentor_id,
            student_id: request.student_id,
            status: request.status,
        });

        tracing::info!(
            request_id = %request.id,
            mentor_id = %mentor_id,
            "Booking request completed"
        );
        Ok(request)
    }
}
