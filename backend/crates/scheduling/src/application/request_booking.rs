//! Request Booking Use Case
//!
//! A student asks for a session: service, preferred date, preferred
//! time. The request is only created when the preferred window is
//! bookable and at least one slot occurrence could host it - but no
//! capacity is reserved until the mentor accepts.

use std::sync::Arc;

use chrono::NaiveDate;
use kernel::id::{ConversationId, MentorId, ServiceTypeId, StudentId};
use platform::clock::Clock;
use platform::sync::KeyedMutex;

use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::event::{EventPublisher, SchedulingEvent};
use crate::domain::repository::{
    AvailabilityRepository, BookingRequestRepository, ServiceCatalogRepository, TimeSlotRepository,
};
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::error::{SchedulingError, SchedulingResult};

/// Input DTO for booking creation
#[derive(Debug, Clone)]
pub struct RequestBookingInput {
    /// Conversation thread the request was sent from (supplied by the
    /// messaging collaborator)
    pub conversation_id: ConversationId,
    pub mentor_id: MentorId,
    pub student_id: StudentId,
    pub service_type_id: ServiceTypeId,
    pub preferred_date: NaiveDate,
    pub preferred_time: MinuteOfDay,
    pub notes: Option<String>,
}

/// Request booking use case
pub struct RequestBookingUseCase<A, S, V, B, C, P>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    V: ServiceCatalogRepository,
    B: BookingRequestRepository,
    C: Clock,
    P: EventPublisher,
{
    availability_repo: Arc<A>,
    slot_repo: Arc<S>,
    service_repo: Arc<V>,
    booking_repo: Arc<B>,
    clock: Arc<C>,
    publisher: Arc<P>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<A, S, V, B, C, P> RequestBookingUseCase<A, S, V, B, C, P>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    V: ServiceCatalogRepository,
    B: BookingRequestRepository,
    C: Clock,
    P: EventPublisher,
{
    pub fn new(
        availability_repo: Arc<A>,
        slot_repo: Arc<S>,
        service_repo: Arc<V>,
        booking_repo: Arc<B>,
        clock: Arc<C>,
        publisher: Arc<P>,
        mentor_gate: Arc<KeyedMutex<MentorId>>,
    ) -> Self {
        Self {
            availability_repo,
            slot_repo,
            service_repo,
            booking_repo,
            clock,
            publisher,
            mentor_gate,
        }
    }

    pub async fn execute(&self, input: RequestBookingInput) -> SchedulingResult<BookingRequest> {
        let _guard = self.mentor_gate.lock(&input.mentor_id).await;

        let service = self
            .service_repo
            .find_by_id(&input.service_type_id)
            .await?
            .filter(|service| service.mentor_id == input.mentor_id)
            .ok_or(SchedulingError::ServiceNotFound(input.service_type_id))?;

        if !service.is_active {
            return Err(SchedulingError::Validation(format!(
                "Service '{}' is not accepting bookings",
                service.title
            )));
        }

        let policy = self
            .availability_repo
            .find_by_mentor(&input.mentor_id)
            .await?
            .ok_or(SchedulingError::PolicyNotFound(input.mentor_id))?;

        let now = self.clock.now();
        let starts_at = input
            .preferred_date
            .and_time(input.preferred_time.to_naive_time());

        if !policy.is_within_bookable_window(starts_at, now) {
            return Err(SchedulingError::Validation(format!(
                "Preferred time {starts_at} is outside the bookable window"
            )));
        }

        // At least one occurrence must be able to host the session
        let slots = self.slot_repo.find_by_mentor(&input.mentor_id).await?;
        let has_match = slots.iter().any(|slot| {
            slot.service_type_ids.contains(&input.service_type_id)
                && slot.schedule.occurs_on(input.preferred_date)
                && slot.covers(input.preferred_time, service.duration_minutes)
                && slot.remaining_on(input.preferred_date) > 0
        });
        if !has_match {
            return Err(SchedulingError::Validation(
                "No available slot matches the requested service and time".into(),
            ));
        }

        let request = BookingRequest::new(
            input.conversation_id,
            input.mentor_id,
            input.student_id,
            service.id,
            input.preferred_date,
            input.preferred_time,
            service.duration_minutes,
            service.price_cents,
            service.currency.clone(),
            input.notes,
        );
        self.booking_repo.create(&request).await?;

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
            student_id = %request.student_id,
            service = %service.title,
            "Booking request created"
        );
        Ok(request)
    }
}
