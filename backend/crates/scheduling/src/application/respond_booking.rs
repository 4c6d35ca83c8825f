//! Respond Booking Use Case
//!
//! The mentor's decision on a pending request. Accepting reserves a
//! seat on the matching slot occurrence; when every matching occurrence
//! is already full the request is declined instead and the caller still
//! sees the capacity error - accept is never silently downgraded.

use std::sync::Arc;

use kernel::id::{BookingRequestId, MentorId};
use platform::sync::KeyedMutex;

use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::event::{EventPublisher, SchedulingEvent};
use crate::domain::repository::{BookingRequestRepository, TimeSlotRepository};
use crate::domain::value_object::booking_status::{BookingStatus, BookingTransition};
use crate::error::{SchedulingError, SchedulingResult};

/// Respond booking use case
pub struct RespondBookingUseCase<B, S, P>
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

impl<B, S, P> RespondBookingUseCase<B, S, P>
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

    /// Accept a pending request, reserving a seat on the matching
    /// occurrence
    pub async fn accept(
        &self,
        mentor_id: MentorId,
        request_id: BookingRequestId,
    ) -> SchedulingResult<BookingRequest> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut request = self.load_owned(&mentor_id, &request_id).await?;
        if request.status != BookingStatus::Pending {
            return Err(SchedulingError::InvalidTransition {
                current: request.status,
                attempted: BookingTransition::Accept,
            });
        }

        // Re-resolve the hosting slot at decision time; the slot set may
        // have changed since the student asked
        let slots = self.slot_repo.find_by_mentor(&mentor_id).await?;
        let matching: Vec<_> = slots
            .iter()
            .filter(|slot| {
                slot.service_type_ids.contains(&request.service_type_id)
                    && slot.schedule.occurs_on(request.preferred_date)
                    && slot.covers(request.preferred_time, request.duration_minutes)
            })
            .collect();

        if matching.is_empty() {
            // Nothing structurally fits anymore (slot edited or deleted);
            // the request stays pending so the mentor can adjust slots
            return Err(SchedulingError::Validation(
                "No slot matches this booking request anymore".into(),
            ));
        }

        let mut capacity_error = None;
        for slot in &matching {
            match self.slot_repo.reserve(&slot.id, request.preferred_date).await {
                Ok(reserved_slot) => {
                    request.accept(reserved_slot.id, request.preferred_date)?;
                    self.booking_repo.update(&request).await?;

                    self.publish_status(&request);
                    self.publisher.publish(SchedulingEvent::SlotCapacityChanged {
                        slot_id: reserved_slot.id,
                        mentor_id,
                        date: request.preferred_date,
                        reserved: reserved_slot.reserved_on(request.preferred_date),
                        remaining: reserved_slot.remaining_on(request.preferred_date),
                    });

                    tracing::info!(
                        request_id = %request.id,
                        slot_id = %reserved_slot.id,
                        mentor_id = %mentor_id,
                        "Booking request accepted"
                    );
                    return Ok(request);
                }
                Err(err @ SchedulingError::Capacity { .. }) => {
                    capacity_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        // Every matching occurrence is full: decline as compensation and
        // surface the capacity error to the caller
        let capacity_error = capacity_error.unwrap_or(SchedulingError::Capacity {
            slot_id: matching[0].id,
            date: request.preferred_date,
        });
        request.decline(Some("No remaining capacity for the requested time".into()))?;
        self.booking_repo.update(&request).await?;
        self.publish_status(&request);

        tracing::warn!(
            request_id = %request.id,
            mentor_id = %mentor_id,
            "Accept failed at capacity; request declined"
        );
        Err(capacity_error)
    }

    /// Decline a pending request; capacity was never reserved, so there
    /// is nothing to release
    pub async fn decline(
        &self,
        mentor_id: MentorId,
        request_id: BookingRequestId,
        reason: Option<String>,
    ) -> SchedulingResult<BookingRequest> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut request = self.load_owned(&mentor_id, &request_id).await?;
        request.decline(reason)?;
        self.booking_repo.update(&request).await?;
        self.publish_status(&request);

        tracing::info!(
            request_id = %request.id,
            mentor_id = %mentor_id,
            "Booking request declined"
        );
        Ok(request)
    }

    async fn load_owned(
        &self,
        mentor_id: &MentorId,
        request_id: &BookingRequestId,
    ) -> SchedulingResult<BookingRequest> {
        self.booking_repo
            .find_by_id(request_id)
            .await?
            .filter(|request| request.mentor_id == *mentor_id)
            .ok_or(SchedulingError::BookingNotFound(*request_id))
    }

    fn publish_status(&self, request: &BookingRequest) {
        self.publisher.publish(SchedulingEvent::BookingStatusChanged {
            request_id: request.id,
            conversation_id: request.conversation_id,
            mentor_id: request.mentor_id,
            student_id: request.student_id,
            status: request.status,
        });
    }
}
