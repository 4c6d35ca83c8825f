//! Availability Policy Entity
//!
//! A mentor's weekly working-hour template and booking policy: the
//! single source of truth every slot and booking decision consults.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use kernel::id::MentorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::value_object::advance_window::AdvanceBookingDays;
use crate::domain::value_object::buffer_time::BufferTime;
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::domain::value_object::timezone::Timezone;
use crate::error::{SchedulingError, SchedulingResult};

/// Working hours for one weekday
///
/// Never deleted - a day the mentor does not work keeps its rule with
/// `is_available = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHourRule {
    pub day: Weekday,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    pub is_available: bool,
}

impl WorkingHourRule {
    /// Create a rule; an available day must have `start < end`
    pub fn new(
        day: Weekday,
        start: MinuteOfDay,
        end: MinuteOfDay,
        is_available: bool,
    ) -> SchedulingResult<Self> {
        if is_available && start >= end {
            return Err(SchedulingError::Validation(format!(
                "Working hours for {day} must start before they end"
            )));
        }
        Ok(Self {
            day,
            start,
            end,
            is_available,
        })
    }

    /// Whether the day is open at the given clock time
    pub fn is_open_at(&self, time: MinuteOfDay) -> bool {
        self.is_available && self.start <= time && time < self.end
    }
}

/// New policy terms, replaced atomically by `set_terms`
#[derive(Debug, Clone)]
pub struct PolicyTerms {
    pub timezone: Timezone,
    pub advance_booking_days: AdvanceBookingDays,
    pub buffer_time: BufferTime,
    pub cancellation_policy: String,
}

/// A mentor's availability policy
///
/// One per mentor, created at onboarding and alive for the account
/// lifetime. All temporal fields are civil time in `timezone`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityPolicy {
    pub mentor_id: MentorId,
    pub timezone: Timezone,
    /// One rule per weekday, indexed Monday-first
    working_hours: [WorkingHourRule; 7],
    pub blocked_dates: BTreeSet<NaiveDate>,
    pub advance_booking_days: AdvanceBookingDays,
    pub buffer_time: BufferTime,
    /// Free text shown to students; refund math lives with the payment
    /// collaborator
    pub cancellation_policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityPolicy {
    /// Create a policy with the given weekly template
    pub fn new(
        mentor_id: MentorId,
        timezone: Timezone,
        working_hours: [WorkingHourRule; 7],
        advance_booking_days: AdvanceBookingDays,
        buffer_time: BufferTime,
        cancellation_policy: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            mentor_id,
            timezone,
            working_hours,
            blocked_dates: BTreeSet::new(),
            advance_booking_days,
            buffer_time,
            cancellation_policy: cancellation_policy.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Standard weekly template: Monday-Friday open, weekend closed
    pub fn standard_week(
        start: MinuteOfDay,
        end: MinuteOfDay,
    ) -> SchedulingResult<[WorkingHourRule; 7]> {
        if start >= end {
            return Err(SchedulingError::Validation(
                "Working hours must start before they end".into(),
            ));
        }
        const DAYS: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        Ok(DAYS.map(|day| WorkingHourRule {
            day,
            start,
            end,
            is_available: !matches!(day, Weekday::Sat | Weekday::Sun),
        }))
    }

    /// The rule for a weekday (always present, days are unique keys)
    pub fn rule_for(&self, day: Weekday) -> &WorkingHourRule {
        &self.working_hours[day.num_days_from_monday() as usize]
    }

    /// Replace the rule for the rule's weekday; last write wins
    pub fn set_working_hour(&mut self, rule: WorkingHourRule) {
        let idx = rule.day.num_days_from_monday() as usize;
        self.working_hours[idx] = rule;
        self.updated_at = Utc::now();
    }

    /// Replace the policy terms atomically
    pub fn set_terms(&mut self, terms: PolicyTerms) {
        self.timezone = terms.timezone;
        self.advance_booking_days = terms.advance_booking_days;
        self.buffer_time = terms.buffer_time;
        self.cancellation_policy = terms.cancellation_policy;
        self.updated_at = Utc::now();
    }

    /// Block a date; returns false if it was already blocked
    pub fn block_date(&mut self, date: NaiveDate) -> bool {
        let inserted = self.blocked_dates.insert(date);
        if inserted {
            self.updated_at = Utc::now();
        }
        inserted
    }

    /// Unblock a date; returns false if it was not blocked
    pub fn unblock_date(&mut self, date: NaiveDate) -> bool {
        let removed = self.blocked_dates.remove(&date);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    /// Last date a booking may target, counting from `today`
    pub fn horizon_end(&self, today: NaiveDate) -> NaiveDate {
        today + self.advance_booking_days.duration()
    }

    /// Whether a candidate instant is bookable: on an open day, inside
    /// that day's working hours, not blocked, in the future, and within
    /// the advance-booking window
    pub fn is_within_bookable_window(&self, candidate: NaiveDateTime, now: NaiveDateTime) -> bool {
        if candidate <= now {
            return false;
        }
        if candidate - now > self.advance_booking_days.duration() {
            return false;
        }
        if self.is_blocked(candidate.date()) {
            return false;
        }
        self.rule_for(candidate.weekday())
            .is_open_at(MinuteOfDay::from_naive_time(candidate.time()))
    }
}
