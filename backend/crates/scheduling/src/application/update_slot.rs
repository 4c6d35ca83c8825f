//! Update Slot Use Case
//!
//! Edits an existing slot under the same validation as creation, plus
//! the structural rules: capacity cannot shrink below booked seats and
//! reserved occurrence dates cannot be scheduled away.

use std::sync::Arc;

use kernel::id::{MentorId, ServiceTypeId, TimeSlotId};
use platform::clock::Clock;
use platform::sync::KeyedMutex;

use crate::domain::entity::time_slot::{SlotSchedule, TimeSlot};
use crate::domain::repository::{AvailabilityRepository, TimeSlotRepository};
use crate::domain::services::find_overlap;
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::error::{SchedulingError, SchedulingResult};

/// Patch for an existing slot; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct UpdateSlotInput {
    pub schedule: Option<SlotSchedule>,
    pub start: Option<MinuteOfDay>,
    pub end: Option<MinuteOfDay>,
    pub max_bookings: Option<u32>,
    pub service_type_ids: Option<Vec<ServiceTypeId>>,
    pub notes: Option<String>,
}

/// Update slot use case
pub struct UpdateSlotUseCase<A, S, C>
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

impl<A, S, C> UpdateSlotUseCase<A, S, C>
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

    pub async fn execute(
        &self,
        mentor_id: MentorId,
        slot_id: TimeSlotId,
        patch: UpdateSlotInput,
    ) -> SchedulingResult<TimeSlot> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let policy = self
            .availability_repo
            .find_by_mentor(&mentor_id)
            .await?
            .ok_or(SchedulingError::PolicyNotFound(mentor_id))?;

        let mut slot = self
            .slot_repo
            .find_by_id(&slot_id)
            .await?
            .filter(|slot| slot.mentor_id == mentor_id)
            .ok_or(SchedulingError::SlotNotFound(slot_id))?;

        let reschedules = patch.schedule.is_some() || patch.start.is_some() || patch.end.is_some();

        if patch.start.is_some() || patch.end.is_some() {
            slot.set_times(
                patch.start.unwrap_or(slot.start),
                patch.end.unwrap_or(slot.end),
            )?;
        }
        if let Some(schedule) = patch.schedule {
            slot.set_schedule(schedule)?;
        }
        if let Some(max_bookings) = patch.max_bookings {
            slot.set_max_bookings(max_bookings)?;
        }
        if let Some(service_type_ids) = patch.service_type_ids {
            slot.set_service_types(service_type_ids)?;
        }
        if let Some(notes) = patch.notes {
            slot.set_notes(Some(notes));
        }

        let now = self.clock.now();

        if reschedules {
            if let SlotSchedule::OneOff { date } = slot.schedule {
                let starts_at = date.and_time(slot.start.to_naive_time());
                if !policy.is_within_bookable_window(starts_at, now) {
                    return Err(SchedulingError::Validation(format!(
                        "Slot start {starts_at} is outside the bookable window"
                    )));
                }
            }

            let today = now.date();
            let existing = self.slot_repo.find_by_mentor(&mentor_id).await?;
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
        }

        self.slot_repo.update(&slot).await?;

        tracing::info!(slot_id = %slot.id, mentor_id = %mentor_id, "Time slot updated");
        Ok(slot)
    }
}
