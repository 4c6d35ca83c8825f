//! List Available Slots Use Case
//!
//! Materializes slot occurrences for the booking UI: every concrete
//! date a slot produces within the requested range and the bookable
//! horizon, minus blocked dates, past occurrences, and exhausted
//! capacity. Read-only; runs against a consistent snapshot without
//! taking the mentor gate.

use std::sync::Arc;

use chrono::NaiveDate;
use kernel::id::{MentorId, ServiceTypeId};
use platform::clock::Clock;

use crate::domain::entity::time_slot::SlotOccurrence;
use crate::domain::repository::{AvailabilityRepository, TimeSlotRepository};
use crate::domain::services::occurrence_dates;
use crate::error::{SchedulingError, SchedulingResult};

/// Query DTO for availability listing
#[derive(Debug, Clone)]
pub struct ListAvailableSlotsInput {
    pub mentor_id: MentorId,
    /// First date of interest, inclusive
    pub from: NaiveDate,
    /// Last date of interest, inclusive
    pub to: NaiveDate,
    /// Restrict to occurrences bookable for this service
    pub service_type_id: Option<ServiceTypeId>,
}

/// List available slots use case
pub struct ListAvailableSlotsUseCase<A, S, C>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    C: Clock,
{
    availability_repo: Arc<A>,
    slot_repo: Arc<S>,
    clock: Arc<C>,
}

impl<A, S, C> ListAvailableSlotsUseCase<A, S, C>
where
    A: AvailabilityRepository,
    S: TimeSlotRepository,
    C: Clock,
{
    pub fn new(availability_repo: Arc<A>, slot_repo: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            availability_repo,
            slot_repo,
            clock,
        }
    }

    /// Occurrences ordered by `(date, start)` ascending
    pub async fn execute(
        &self,
        input: ListAvailableSlotsInput,
    ) -> SchedulingResult<Vec<SlotOccurrence>> {
        let policy = self
            .availability_repo
            .find_by_mentor(&input.mentor_id)
            .await?
            .ok_or(SchedulingError::PolicyNotFound(input.mentor_id))?;

        let now = self.clock.now();
        let today = now.date();

        // Clamp the requested range to the bookable horizon
        let from = input.from.max(today);
        let to = input.to.min(policy.horizon_end(today));

        let slots = self.slot_repo.find_by_mentor(&input.mentor_id).await?;

        let mut occurrences: Vec<SlotOccurrence> = slots
            .iter()
            .filter(|slot| match input.service_type_id {
                Some(service_id) => slot.service_type_ids.contains(&service_id),
                None => true,
            })
            .flat_map(|slot| {
                occurrence_dates(&slot.schedule, from, to)
                    .into_iter()
                    .filter_map(|date| slot.occurrence_on(date))
            })
            .filter(|occurrence| !policy.is_blocked(occurrence.date))
            .filter(|occurrence| occurrence.start_at() > now)
            .filter(|occurrence| occurrence.remaining() > 0)
            .collect();

        occurrences.sort_by_key(|occurrence| (occurrence.date, occurrence.start));

        Ok(occurrences)
    }
}
