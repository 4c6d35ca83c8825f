//! Create Slot Use Case
//!
//! Publishes a new bookable slot after checking the mentor's policy
//! and the buffer-padded overlap rule against every occurrence in the
//! advance-booking horizon.

use std::sync::Arc;

use kernel::id::{MentorId, ServiceTypeId};
use platform::clock::Clock;
use platform::sync::KeyedMutex;

use crate::domain::entity::time_slot::{SlotSchedule, TimeSlot};
use crate::domain::repository::{AvailabilityRepository, TimeSlotRepository};
use crate::domain::services::find_overlap;
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::error::{SchedulingError, SchedulingResult};

/// Input DTO for slot creation
#[derive(Debug, Clone)]
pub struct CreateSlotInput {
    pub mentor_id: MentorId,
    pub schedule: SlotSchedule,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    pub max_bookings: u32,
    pub service_type_ids: Vec<ServiceTypeId>,
    pub notes: Option<String>,
}

/// Create slot use case
pub struct CreateSlotUseCase<A, S, C>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    C: Clock,
{
    availability_repo: Arc<A>,
    slot_repo: Arc<S>,
    clock: Arc<C>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<A, S, C> CreateSlotUseCase<A, S, C>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    C: Clock,
{
    pub fn new(
        availability_repo: Arc<A>,
        slot_repo: Arc<S>,
        clock: Arc<C>,
        mentor_gate: Arc<KeyedMutex<MentorId>>,
    ) -> Self {
        Self {
            availability_repo,
            slot_repo,
            clock,
            mentor_gate,
        }
    }

    pub async fn execute(&self, input: CreateSlotInput) -> SchedulingResult<TimeSlot> {
        let _guard = self.mentor_gate.lock(&input.mentor_id).await;

        let policy = self
            .availability_repo
            .find_by_mentor(&input.mentor_id)
            .await?
            .ok_or(SchedulingError::PolicyNotFound(input.mentor_id))?;

        let slot = TimeSlot::new(
            input.mentor_id,
            input.schedule,
            input.start,
            input.end,
            input.max_bookings,
            input.service_type_ids,
            input.notes,
        )?;

        let now = self.clock.now();

        // A one-off slot must sit inside the bookable window; recurring
        // slots materialize per date, so unbookable occurrences simply
        // never surface in queries
        if let SlotSchedule::OneOff { date } = slot.schedule {
            let starts_at = date.and_time(slot.start.to_naive_time());
            if !policy.is_within_bookable_window(starts_at, now) {
                return Err(SchedulingError::Validation(format!(
                    "Slot start {starts_at} is outside the bookable window"
                )));
            }
        }

        let today = now.date();
        let existing = self.slot_repo.find_by_mentor(&input.mentor_id).await?;
        if let Some((existing_slot_id, date)) = find_overlap(
            &slot,
            &existing,
            policy.buffer_time.duration(),
            today,
            policy.horizon_end(today),
        ) {
            return Err(SchedulingError::Overlap {
                existing_slot_id,
                date,
            });
        }

        self.slot_repo.create(&slot).await?;

        tracing::info!(
            slot_id = %slot.id,
            mentor_id = %slot.mentor_id,
            recurring = slot.schedule.is_recurring(),
            "Time slot created"
        );
        Ok(slot)
    }
}
