//! Repository Traits
//!
//! Interfaces for data persistence. The provided implementation is the
//! in-memory store in the infrastructure layer; a storage collaborator
//! can implement the same traits against a database.

use chrono::NaiveDate;
use kernel::id::{BookingRequestId, ConversationId, MentorId, ServiceTypeId, StudentId, TimeSlotId};

use crate::domain::entity::availability::AvailabilityPolicy;
use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::entity::mentor_service::MentorService;
use crate::domain::entity::time_slot::TimeSlot;
use crate::error::SchedulingResult;

/// Availability policy repository trait
#[trait_variant::make(AvailabilityRepository: Send)]
pub trait LocalAvailabilityRepository {
    /// Create a policy; fails if the mentor already has one
    async fn create(&self, policy: &AvailabilityPolicy) -> SchedulingResult<()>;

    /// Find the mentor's policy
    async fn find_by_mentor(&self, mentor_id: &MentorId)
    -> SchedulingResult<Option<AvailabilityPolicy>>;

    /// Replace the mentor's policy
    async fn update(&self, policy: &AvailabilityPolicy) -> SchedulingResult<()>;
}

/// Time slot repository trait
#[trait_variant::make(TimeSlotRepository: Send)]
pub trait LocalTimeSlotRepository {
    /// Persist a new slot
    async fn create(&self, slot: &TimeSlot) -> SchedulingResult<()>;

    /// Find a slot by ID
    async fn find_by_id(&self, slot_id: &TimeSlotId) -> SchedulingResult<Option<TimeSlot>>;

    /// All slots of a mentor, in creation order
    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<TimeSlot>>;

    /// Replace a slot
    async fn update(&self, slot: &TimeSlot) -> SchedulingResult<()>;

    /// Delete a slot
    async fn delete(&self, slot_id: &TimeSlotId) -> SchedulingResult<()>;

    /// Atomically take one seat on an occurrence; the only operation
    /// that increments a reservation counter
    async fn reserve(&self, slot_id: &TimeSlotId, date: NaiveDate) -> SchedulingResult<TimeSlot>;

    /// Atomically give back one seat on an occurrence, floored at zero
    async fn release(&self, slot_id: &TimeSlotId, date: NaiveDate) -> SchedulingResult<TimeSlot>;
}

/// Booking request repository trait
#[trait_variant::make(BookingRequestRepository: Send)]
pub trait LocalBookingRequestRepository {
    /// Persist a new request
    async fn create(&self, request: &BookingRequest) -> SchedulingResult<()>;

    /// Find a request by ID
    async fn find_by_id(
        &self,
        request_id: &BookingRequestId,
    ) -> SchedulingResult<Option<BookingRequest>>;

    /// All requests addressed to a mentor
    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<BookingRequest>>;

    /// All requests created by a student
    async fn find_by_student(&self, student_id: &StudentId)
    -> SchedulingResult<Vec<BookingRequest>>;

    /// All requests attached to a conversation thread
    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> SchedulingResult<Vec<BookingRequest>>;

    /// Replace a request
    async fn update(&self, request: &BookingRequest) -> SchedulingResult<()>;
}

/// Service catalog repository trait
#[trait_variant::make(ServiceCatalogRepository: Send)]
pub trait LocalServiceCatalogRepository {
    /// Persist a new service
    async fn create(&self, service: &MentorService) -> SchedulingResult<()>;

    /// Find a service by ID
    async fn find_by_id(&self, service_id: &ServiceTypeId)
    -> SchedulingResult<Option<MentorService>>;

    /// All services of a mentor, in creation order
    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<MentorService>>;

    /// Replace a service
    async fn update(&self, service: &MentorService) -> SchedulingResult<()>;
}
