//! Time Slot Entity
//!
//! A bookable window a mentor publishes: either a one-off window on a
//! fixed date, or a recurring template that produces one occurrence per
//! matching weekday. Capacity is tracked per occurrence date, so a
//! weekly slot with `max_bookings = 6` seats 6 students every week, not
//! 6 across the whole series.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use kernel::id::{MentorId, ServiceTypeId, TimeSlotId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::error::{SchedulingError, SchedulingResult};

/// When a slot occurs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotSchedule {
    /// Exactly one occurrence on a fixed date
    OneOff { date: NaiveDate },
    /// One occurrence per matching weekday, no fixed date
    Recurring { days: Vec<Weekday> },
}

impl SlotSchedule {
    pub fn one_off(date: NaiveDate) -> Self {
        Self::OneOff { date }
    }

    /// A recurring schedule needs at least one weekday; duplicates are
    /// dropped and days are stored Monday-first
    pub fn recurring(days: impl IntoIterator<Item = Weekday>) -> SchedulingResult<Self> {
        let mut seen = BTreeSet::new();
        for day in days {
            seen.insert(day.num_days_from_monday());
        }
        if seen.is_empty() {
            return Err(SchedulingError::Validation(
                "A recurring slot needs at least one weekday".into(),
            ));
        }
        const WEEK: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        Ok(Self::Recurring {
            days: seen
                .into_iter()
                .map(|index| WEEK[index as usize])
                .collect(),
        })
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Recurring { .. })
    }

    /// Whether the schedule produces an occurrence on `date`
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self {
            Self::OneOff { date: fixed } => *fixed == date,
            Self::Recurring { days } => days.contains(&date.weekday()),
        }
    }
}

/// A bookable time slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub mentor_id: MentorId,
    pub schedule: SlotSchedule,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    /// Seats per occurrence
    pub max_bookings: u32,
    /// Reserved seats per occurrence date; dates without reservations
    /// carry no entry
    reserved: BTreeMap<NaiveDate, u32>,
    /// Services bookable in this slot
    pub service_type_ids: BTreeSet<ServiceTypeId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Create a slot with zero reservations
    pub fn new(
        mentor_id: MentorId,
        schedule: SlotSchedule,
        start: MinuteOfDay,
        end: MinuteOfDay,
        max_bookings: u32,
        service_type_ids: impl IntoIterator<Item = ServiceTypeId>,
        notes: Option<String>,
    ) -> SchedulingResult<Self> {
        if start >= end {
            return Err(SchedulingError::Validation(
                "Slot start time must be before its end time".into(),
            ));
        }
        if max_bookings == 0 {
            return Err(SchedulingError::Validation(
                "Slot capacity must be at least 1".into(),
            ));
        }
        let service_type_ids: BTreeSet<ServiceTypeId> = service_type_ids.into_iter().collect();
        if service_type_ids.is_empty() {
            return Err(SchedulingError::Validation(
                "Slot must allow at least one service".into(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: TimeSlotId::new(),
            mentor_id,
            schedule,
            start,
            end,
            max_bookings,
            reserved: BTreeMap::new(),
            service_type_ids,
            notes,
            created_at: now,
            updated_at: now,
        })
    }

    // ========================================================================
    // Capacity
    // ========================================================================

    /// Reserved seats on one occurrence
    pub fn reserved_on(&self, date: NaiveDate) -> u32 {
        self.reserved.get(&date).copied().unwrap_or(0)
    }

    /// Free seats on one occurrence
    pub fn remaining_on(&self, date: NaiveDate) -> u32 {
        self.max_bookings.saturating_sub(self.reserved_on(date))
    }

    /// Whether any occurrence holds reservations
    pub fn has_reservations(&self) -> bool {
        self.reserved.values().any(|&count| count > 0)
    }

    /// Occurrence dates currently holding reservations
    pub fn reserved_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.reserved
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&date, _)| date)
    }

    /// Compare-and-increment one occurrence's reservation counter
    ///
    /// The only way a counter goes up. Fails when the occurrence is at
    /// capacity, or when the slot does not occur on `date` at all.
    pub fn reserve_on(&mut self, date: NaiveDate) -> SchedulingResult<u32> {
        if !self.schedule.occurs_on(date) {
            return Err(SchedulingError::Validation(format!(
                "Slot has no occurrence on {date}"
            )));
        }
        let current = self.reserved_on(date);
        if current >= self.max_bookings {
            return Err(SchedulingError::Capacity {
                slot_id: self.id,
                date,
            });
        }
        self.reserved.insert(date, current + 1);
        self.updated_at = Utc::now();
        Ok(current + 1)
    }

    /// Decrement one occurrence's reservation counter, floored at zero
    pub fn release_on(&mut self, date: NaiveDate) -> u32 {
        let current = self.reserved_on(date);
        if current == 0 {
            return 0;
        }
        if current == 1 {
            self.reserved.remove(&date);
        } else {
            self.reserved.insert(date, current - 1);
        }
        self.updated_at = Utc::now();
        current - 1
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Change the time range
    pub fn set_times(&mut self, start: MinuteOfDay, end: MinuteOfDay) -> SchedulingResult<()> {
        if start >= end {
            return Err(SchedulingError::Validation(
                "Slot start time must be before its end time".into(),
            ));
        }
        self.start = start;
        self.end = end;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change the schedule; every date with reservations must still
    /// produce an occurrence afterwards
    pub fn set_schedule(&mut self, schedule: SlotSchedule) -> SchedulingResult<()> {
        if let Some(date) = self.reserved_dates().find(|&date| !schedule.occurs_on(date)) {
            return Err(SchedulingError::Conflict(format!(
                "Cannot reschedule: occurrence on {date} still has bookings"
            )));
        }
        self.schedule = schedule;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Change per-occurrence capacity; cannot shrink below any
    /// occurrence's current reservations
    pub fn set_max_bookings(&mut self, max_bookings: u32) -> SchedulingResult<()> {
        if max_bookings == 0 {
            return Err(SchedulingError::Validation(
                "Slot capacity must be at least 1".into(),
            ));
        }
        if let Some((&date, &count)) = self.reserved.iter().find(|&(_, &count)| count > max_bookings)
        {
            return Err(SchedulingError::Conflict(format!(
                "Cannot shrink capacity to {max_bookings}: {count} seats already booked on {date}"
            )));
        }
        self.max_bookings = max_bookings;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the bookable service set
    pub fn set_service_types(
        &mut self,
        service_type_ids: impl IntoIterator<Item = ServiceTypeId>,
    ) -> SchedulingResult<()> {
        let service_type_ids: BTreeSet<ServiceTypeId> = service_type_ids.into_iter().collect();
        if service_type_ids.is_empty() {
            return Err(SchedulingError::Validation(
                "Slot must allow at least one service".into(),
            ));
        }
        self.service_type_ids = service_type_ids;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.updated_at = Utc::now();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `[start, start + duration)` fits inside this slot
    pub fn covers(&self, start: MinuteOfDay, duration_minutes: u32) -> bool {
        self.start <= start
            && start.minutes() as u32 + duration_minutes <= self.end.minutes() as u32
    }

    /// Materialize the occurrence on `date`, if the schedule produces one
    pub fn occurrence_on(&self, date: NaiveDate) -> Option<SlotOccurrence> {
        if !self.schedule.occurs_on(date) {
            return None;
        }
        Some(SlotOccurrence {
            slot_id: self.id,
            mentor_id: self.mentor_id,
            date,
            start: self.start,
            end: self.end,
            reserved: self.reserved_on(date),
            max_bookings: self.max_bookings,
            service_type_ids: self.service_type_ids.iter().copied().collect(),
            notes: self.notes.clone(),
        })
    }
}

/// One concrete, dated occurrence of a slot
///
/// Read model consumed by availability queries and the booking UI; the
/// derived `is_available` flag of the UI is `remaining() > 0` plus the
/// blocked/past filters applied by the query.
#[derive(Debug, Clone, Serialize)]
pub struct SlotOccurrence {
    pub slot_id: TimeSlotId,
    pub mentor_id: MentorId,
    pub date: NaiveDate,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    pub reserved: u32,
    pub max_bookings: u32,
    pub service_type_ids: Vec<ServiceTypeId>,
    pub notes: Option<String>,
}

impl SlotOccurrence {
    pub fn remaining(&self) -> u32 {
        self.max_bookings.saturating_sub(self.reserved)
    }

    /// Start instant in the mentor's timezone
    pub fn start_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start.to_naive_time())
    }

    /// End instant (exclusive) in the mentor's timezone
    pub fn end_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end.to_naive_time())
    }
}
