//! In-Memory Repository Implementation
//!
//! Backs every repository trait with maps behind one `RwLock`. Writers
//! serialize on the lock, so `reserve` is a true compare-and-increment;
//! readers share it and always observe a consistent snapshot. A storage
//! collaborator replaces this with a database-backed implementation of
//! the same traits.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use kernel::id::{BookingRequestId, ConversationId, MentorId, ServiceTypeId, StudentId, TimeSlotId};
use tokio::sync::RwLock;

use crate::domain::entity::availability::AvailabilityPolicy;
use crate::domain::entity::booking_request::BookingRequest;
use crate::domain::entity::mentor_service::MentorService;
use crate::domain::entity::time_slot::TimeSlot;
use crate::domain::repository::{
    AvailabilityRepository, BookingRequestRepository, ServiceCatalogRepository, TimeSlotRepository,
};
use crate::error::{SchedulingError, SchedulingResult};

#[derive(Default)]
struct StoreState {
    policies: HashMap<MentorId, AvailabilityPolicy>,
    slots: HashMap<TimeSlotId, TimeSlot>,
    /// Creation-ordered slot ids per mentor
    slots_by_mentor: HashMap<MentorId, Vec<TimeSlotId>>,
    bookings: HashMap<BookingRequestId, BookingRequest>,
    bookings_by_mentor: HashMap<MentorId, Vec<BookingRequestId>>,
    bookings_by_student: HashMap<StudentId, Vec<BookingRequestId>>,
    bookings_by_conversation: HashMap<ConversationId, Vec<BookingRequestId>>,
    services: HashMap<ServiceTypeId, MentorService>,
    services_by_mentor: HashMap<MentorId, Vec<ServiceTypeId>>,
}

/// In-memory scheduling store
///
/// Cheap to clone; clones share the same state, like a pooled
/// database handle would.
#[derive(Clone, Default)]
pub struct InMemoryScheduleStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AvailabilityRepository for InMemoryScheduleStore {
    async fn create(&self, policy: &AvailabilityPolicy) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if state.policies.contains_key(&policy.mentor_id) {
            return Err(SchedulingError::Conflict(
                "Availability policy already exists for this mentor".into(),
            ));
        }
        state.policies.insert(policy.mentor_id, policy.clone());
        Ok(())
    }

    async fn find_by_mentor(
        &self,
        mentor_id: &MentorId,
    ) -> SchedulingResult<Option<AvailabilityPolicy>> {
        let state = self.state.read().await;
        Ok(state.policies.get(mentor_id).cloned())
    }

    async fn update(&self, policy: &AvailabilityPolicy) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if !state.policies.contains_key(&policy.mentor_id) {
            return Err(SchedulingError::PolicyNotFound(policy.mentor_id));
        }
        state.policies.insert(policy.mentor_id, policy.clone());
        Ok(())
    }
}

impl TimeSlotRepository for InMemoryScheduleStore {
    async fn create(&self, slot: &TimeSlot) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if state.slots.contains_key(&slot.id) {
            return Err(SchedulingError::Conflict(format!(
                "Slot {} already exists",
                slot.id
            )));
        }
        state
            .slots_by_mentor
            .entry(slot.mentor_id)
            .or_default()
            .push(slot.id);
        state.slots.insert(slot.id, slot.clone());
        tracing::debug!(slot_id = %slot.id, "Slot stored");
        Ok(())
    }

    async fn find_by_id(&self, slot_id: &TimeSlotId) -> SchedulingResult<Option<TimeSlot>> {
        let state = self.state.read().await;
        Ok(state.slots.get(slot_id).cloned())
    }

    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<TimeSlot>> {
        let state = self.state.read().await;
        Ok(state
            .slots_by_mentor
            .get(mentor_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.slots.get(id).cloned())
            .collect())
    }

    async fn update(&self, slot: &TimeSlot) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if !state.slots.contains_key(&slot.id) {
            return Err(SchedulingError::SlotNotFound(slot.id));
        }
        state.slots.insert(slot.id, slot.clone());
        Ok(())
    }

    async fn delete(&self, slot_id: &TimeSlotId) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .slots
            .remove(slot_id)
            .ok_or(SchedulingError::SlotNotFound(*slot_id))?;
        if let Some(ids) = state.slots_by_mentor.get_mut(&slot.mentor_id) {
            ids.retain(|id| id != slot_id);
        }
        tracing::debug!(slot_id = %slot_id, "Slot removed");
        Ok(())
    }

    async fn reserve(&self, slot_id: &TimeSlotId, date: NaiveDate) -> SchedulingResult<TimeSlot> {
        // Check and increment under the write lock: two racing reserves
        // on the last seat cannot both pass the capacity check
        let mut state = self.state.write().await;
        let slot = state
            .slots
            .get_mut(slot_id)
            .ok_or(SchedulingError::SlotNotFound(*slot_id))?;
        let reserved = slot.reserve_on(date)?;
        tracing::debug!(slot_id = %slot_id, %date, reserved, "Seat reserved");
        Ok(slot.clone())
    }

    async fn release(&self, slot_id: &TimeSlotId, date: NaiveDate) -> SchedulingResult<TimeSlot> {
        let mut state = self.state.write().await;
        let slot = state
            .slots
            .get_mut(slot_id)
            .ok_or(SchedulingError::SlotNotFound(*slot_id))?;
        let reserved = slot.release_on(date);
        tracing::debug!(slot_id = %slot_id, %date, reserved, "Seat released");
        Ok(slot.clone())
    }
}

impl BookingRequestRepository for InMemoryScheduleStore {
    async fn create(&self, request: &BookingRequest) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if state.bookings.contains_key(&request.id) {
            return Err(SchedulingError::Conflict(format!(
                "Booking request {} already exists",
                request.id
            )));
        }
        state
            .bookings_by_mentor
            .entry(request.mentor_id)
            .or_default()
            .push(request.id);
        state
            .bookings_by_student
            .entry(request.student_id)
            .or_default()
            .push(request.id);
        state
            .bookings_by_conversation
            .entry(request.conversation_id)
            .or_default()
            .push(request.id);
        state.bookings.insert(request.id, request.clone());
        tracing::debug!(request_id = %request.id, "Booking request stored");
        Ok(())
    }

    async fn find_by_id(
        &self,
        request_id: &BookingRequestId,
    ) -> SchedulingResult<Option<BookingRequest>> {
        let state = self.state.read().await;
        Ok(state.bookings.get(request_id).cloned())
    }

    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<BookingRequest>> {
        let state = self.state.read().await;
        Ok(state
            .bookings_by_mentor
            .get(mentor_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.bookings.get(id).cloned())
            .collect())
    }

    async fn find_by_student(
        &self,
        student_id: &StudentId,
    ) -> SchedulingResult<Vec<BookingRequest>> {
        let state = self.state.read().await;
        Ok(state
            .bookings_by_student
            .get(student_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.bookings.get(id).cloned())
            .collect())
    }

    async fn find_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> SchedulingResult<Vec<BookingRequest>> {
        let state = self.state.read().await;
        Ok(state
            .bookings_by_conversation
            .get(conversation_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.bookings.get(id).cloned())
            .collect())
    }

    async fn update(&self, request: &BookingRequest) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if !state.bookings.contains_key(&request.id) {
            return Err(SchedulingError::BookingNotFound(request.id));
        }
        state.bookings.insert(request.id, request.clone());
        Ok(())
    }
}

impl ServiceCatalogRepository for InMemoryScheduleStore {
    async fn create(&self, service: &MentorService) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if state.services.contains_key(&service.id) {
            return Err(SchedulingError::Conflict(format!(
                "Service {} already exists",
                service.id
            )));
        }
        state
            .services_by_mentor
            .entry(service.mentor_id)
            .or_default()
            .push(service.id);
        state.services.insert(service.id, service.clone());
        tracing::debug!(service_id = %service.id, "Service stored");
        Ok(())
    }

    async fn find_by_id(
        &self,
        service_id: &ServiceTypeId,
    ) -> SchedulingResult<Option<MentorService>> {
        let state = self.state.read().await;
        Ok(state.services.get(service_id).cloned())
    }

    async fn find_by_mentor(&self, mentor_id: &MentorId) -> SchedulingResult<Vec<MentorService>> {
        let state = self.state.read().await;
        Ok(state
            .services_by_mentor
            .get(mentor_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.services.get(id).cloned())
            .collect())
    }

    async fn update(&self, service: &MentorService) -> SchedulingResult<()> {
        let mut state = self.state.write().await;
        if !state.services.contains_key(&service.id) {
            return Err(SchedulingError::ServiceNotFound(service.id));
        }
        state.services.insert(service.id, service.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::time_slot::SlotSchedule;

    fn slot() -> TimeSlot {
        TimeSlot::new(
            MentorId::new(),
            SlotSchedule::one_off(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()),
            "10:00".parse().unwrap(),
            "11:00".parse().unwrap(),
            1,
            [ServiceTypeId::new()],
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_slot_crud() {
        let store = InMemoryScheduleStore::new();
        let slot = slot();

        TimeSlotRepository::create(&store, &slot).await.unwrap();
        assert!(
            TimeSlotRepository::find_by_id(&store, &slot.id)
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(
            TimeSlotRepository::find_by_mentor(&store, &slot.mentor_id)
                .await
                .unwrap()
                .len(),
            1
        );

        store.delete(&slot.id).await.unwrap();
        assert!(
            TimeSlotRepository::find_by_id(&store, &slot.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            TimeSlotRepository::find_by_mentor(&store, &slot.mentor_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_reserve_is_atomic_at_capacity() {
        let store = InMemoryScheduleStore::new();
        let slot = slot();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        TimeSlotRepository::create(&store, &slot).await.unwrap();

        assert!(store.reserve(&slot.id, date).await.is_ok());
        assert!(matches!(
            store.reserve(&slot.id, date).await,
            Err(SchedulingError::Capacity { .. })
        ));

        store.release(&slot.id, date).await.unwrap();
        assert!(store.reserve(&slot.id, date).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = InMemoryScheduleStore::new();
        assert!(matches!(
            store.reserve(&TimeSlotId::new(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
                .await,
            Err(SchedulingError::SlotNotFound(_))
        ));
        assert!(
            BookingRequestRepository::find_by_id(&store, &BookingRequestId::new())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_policy_create_is_unique_per_mentor() {
        let store = InMemoryScheduleStore::new();
        let policy = AvailabilityPolicy::new(
            MentorId::new(),
            crate::domain::value_object::timezone::Timezone::new("UTC").unwrap(),
            AvailabilityPolicy::standard_week(
                "09:00".parse().unwrap(),
                "17:00".parse().unwrap(),
            )
            .unwrap(),
            crate::domain::value_object::advance_window::AdvanceBookingDays::DEFAULT,
            crate::domain::value_object::buffer_time::BufferTime::Fifteen,
            "",
        );
        AvailabilityRepository::create(&store, &policy).await.unwrap();
        assert!(matches!(
            AvailabilityRepository::create(&store, &policy).await,
            Err(SchedulingError::Conflict(_))
        ));
    }
}
