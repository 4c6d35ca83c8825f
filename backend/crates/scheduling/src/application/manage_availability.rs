//! Manage Availability Use Case
//!
//! Mentor-facing operations on the availability policy: onboarding,
//! weekly working hours, policy terms, and blocked dates. All writes to
//! a mentor's schedule are serialized through the per-mentor gate.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use kernel::id::MentorId;
use platform::sync::KeyedMutex;

use crate::application::config::SchedulingConfig;
use crate::domain::entity::availability::{AvailabilityPolicy, PolicyTerms, WorkingHourRule};
use crate::domain::repository::AvailabilityRepository;
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::domain::value_object::timezone::Timezone;
use crate::error::{SchedulingError, SchedulingResult};

/// Manage availability use case
pub struct ManageAvailabilityUseCase<A>
where
    A: AvailabilityRepository,
{
    availability_repo: Arc<A>,
    config: Arc<SchedulingConfig>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<A> ManageAvailabilityUseCase<A>
where
    A: AvailabilityRepository,
{
    pub fn new(
        availability_repo: Arc<A>,
        config: Arc<SchedulingConfig>,
        mentor_gate: Arc<KeyedMutex<MentorId>>,
    ) -> Self {
        Self {
            availability_repo,
            config,
            mentor_gate,
        }
    }

    /// Create the mentor's policy at onboarding with the configured
    /// defaults; fails if one already exists
    pub async fn initialize(
        &self,
        mentor_id: MentorId,
        timezone: Timezone,
    ) -> SchedulingResult<AvailabilityPolicy> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        if self
            .availability_repo
            .find_by_mentor(&mentor_id)
            .await?
            .is_some()
        {
            return Err(SchedulingError::Conflict(
                "Availability policy already exists for this mentor".into(),
            ));
        }

        let working_hours = AvailabilityPolicy::standard_week(
            self.config.default_working_start,
            self.config.default_working_end,
        )?;
        let policy = AvailabilityPolicy::new(
            mentor_id,
            timezone,
            working_hours,
            self.config.default_advance_booking_days,
            self.config.default_buffer_time,
            self.config.default_cancellation_policy.clone(),
        );
        self.availability_repo.create(&policy).await?;

        tracing::info!(mentor_id = %mentor_id, "Availability policy created");
        Ok(policy)
    }

    /// Replace the working-hour rule for one weekday; last write wins
    pub async fn set_working_hour(
        &self,
        mentor_id: MentorId,
        day: Weekday,
        start: MinuteOfDay,
        end: MinuteOfDay,
        is_available: bool,
    ) -> SchedulingResult<AvailabilityPolicy> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut policy = self.load(&mentor_id).await?;
        let rule = WorkingHourRule::new(day, start, end, is_available)?;
        policy.set_working_hour(rule);
        self.availability_repo.update(&policy).await?;

        tracing::info!(mentor_id = %mentor_id, day = %day, "Working hours updated");
        Ok(policy)
    }

    /// Replace the policy terms atomically; readers never observe a
    /// partial update
    pub async fn set_policy(
        &self,
        mentor_id: MentorId,
        terms: PolicyTerms,
    ) -> SchedulingResult<AvailabilityPolicy> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut policy = self.load(&mentor_id).await?;
        policy.set_terms(terms);
        self.availability_repo.update(&policy).await?;

        tracing::info!(
            mentor_id = %mentor_id,
            advance_days = policy.advance_booking_days.days(),
            buffer = %policy.buffer_time,
            "Booking policy updated"
        );
        Ok(policy)
    }

    /// Block a date; idempotent
    pub async fn add_blocked_date(
        &self,
        mentor_id: MentorId,
        date: NaiveDate,
    ) -> SchedulingResult<AvailabilityPolicy> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut policy = self.load(&mentor_id).await?;
        if policy.block_date(date) {
            self.availability_repo.update(&policy).await?;
            tracing::info!(mentor_id = %mentor_id, %date, "Date blocked");
        }
        Ok(policy)
    }

    /// Unblock a date; idempotent
    pub async fn remove_blocked_date(
        &self,
        mentor_id: MentorId,
        date: NaiveDate,
    ) -> SchedulingResult<AvailabilityPolicy> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut policy = self.load(&mentor_id).await?;
        if policy.unblock_date(date) {
            self.availability_repo.update(&policy).await?;
            tracing::info!(mentor_id = %mentor_id, %date, "Date unblocked");
        }
        Ok(policy)
    }

    async fn load(&self, mentor_id: &MentorId) -> SchedulingResult<AvailabilityPolicy> {
        self.availability_repo
            .find_by_mentor(mentor_id)
            .await?
            .ok_or(SchedulingError::PolicyNotFound(*mentor_id))
    }
}
