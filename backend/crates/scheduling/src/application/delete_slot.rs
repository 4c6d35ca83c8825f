//! Delete Slot Use Case
//!
//! Removes a slot. Occurrences still holding reservations make this a
//! conflict - the mentor has to cancel or decline those bookings first;
//! nothing cascades.

use std::sync::Arc;

use kernel::id::{MentorId, TimeSlotId};
use platform::sync::KeyedMutex;

use crate::domain::repository::TimeSlotRepository;
use crate::error::{SchedulingError, SchedulingResult};

/// Delete slot use case
pub struct DeleteSlotUseCase<S>
where
    S: TimeSlotRepository,
{
    slot_repo: Arc<S>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<S> DeleteSlotUseCase<S>
where
    S: TimeSlotRepository,
{
    pub fn new(slot_repo: Arc<S>, mentor_gate: Arc<KeyedMutex<MentorId>>) -> Self {
        Self {
            slot_repo,
            mentor_gate,
        }
    }

    pub async fn execute(&self, mentor_id: MentorId, slot_id: TimeSlotId) -> SchedulingResult<()> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let slot = self
            .slot_repo
            .find_by_id(&slot_id)
            .await?
            .filter(|slot| slot.mentor_id == mentor_id)
            .ok_or(SchedulingError::SlotNotFound(slot_id))?;

        if slot.has_reservations() {
            return Err(SchedulingError::Conflict(
                "Slot still has active bookings; cancel or decline them first".into(),
            ));
        }

        self.slot_repo.delete(&slot_id).await?;

        tracing::info!(slot_id = %slot_id, mentor_id = %mentor_id, "Time slot deleted");
        Ok(())
    }
}
