//! Domain Services
//!
//! Pure scheduling arithmetic: expanding schedules into concrete
//! occurrence dates and testing dated intervals for buffer-padded
//! conflicts.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use kernel::id::TimeSlotId;

use crate::domain::entity::time_slot::{SlotSchedule, TimeSlot};
use crate::domain::value_object::minute_of_day::MinuteOfDay;

/// Concrete occurrence dates a schedule produces within `[from, to]`
///
/// A one-off schedule yields its date when it falls in the range; a
/// recurring schedule yields every matching weekday. Dates come back
/// ascending.
pub fn occurrence_dates(schedule: &SlotSchedule, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if from > to {
        return Vec::new();
    }
    match schedule {
        SlotSchedule::OneOff { date } => {
            if (from..=to).contains(date) {
                vec![*date]
            } else {
                Vec::new()
            }
        }
        SlotSchedule::Recurring { .. } => from
            .iter_days()
            .take_while(|date| *date <= to)
            .filter(|date| schedule.occurs_on(*date))
            .collect(),
    }
}

/// Absolute `[start, end)` span of an occurrence in the owner's timezone
pub fn span_of(
    date: NaiveDate,
    start: MinuteOfDay,
    end: MinuteOfDay,
) -> (NaiveDateTime, NaiveDateTime) {
    (
        date.and_time(start.to_naive_time()),
        date.and_time(end.to_naive_time()),
    )
}

/// Whether two spans conflict once padded with the buffer on both sides
///
/// `a.start < b.end + buffer && b.start < a.end + buffer` - symmetric,
/// and treats a gap smaller than the buffer as a conflict. Spans on
/// adjacent dates can conflict when the buffer crosses midnight, which
/// is why callers compare dated spans rather than bare clock times.
pub fn spans_conflict(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
    buffer: Duration,
) -> bool {
    a.0 < b.1 + buffer && b.0 < a.1 + buffer
}

/// First buffer-padded collision between a candidate slot and a set of
/// existing slots, checked occurrence by occurrence within `[from, to]`
///
/// Every concrete date both slots produce in the horizon is compared,
/// not just weekday labels - two recurring slots with different weekday
/// sets can still land on the same calendar date. Existing occurrences
/// on the day before and after a candidate date are included so a
/// buffer spilling over midnight is not missed.
pub fn find_overlap(
    candidate: &TimeSlot,
    existing: &[TimeSlot],
    buffer: Duration,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<(TimeSlotId, NaiveDate)> {
    let candidate_dates = occurrence_dates(&candidate.schedule, from, to);
    for other in existing {
        if other.id == candidate.id {
            continue;
        }
        let other_dates: std::collections::BTreeSet<NaiveDate> =
            occurrence_dates(&other.schedule, from, to).into_iter().collect();
        for &date in &candidate_dates {
            let window = date.pred_opt().unwrap_or(date)..=date.succ_opt().unwrap_or(date);
            for &other_date in other_dates.range(window) {
                let a = span_of(date, candidate.start, candidate.end);
                let b = span_of(other_date, other.start, other.end);
                if spans_conflict(a, b, buffer) {
                    return Some((other.id, other_date));
                }
            }
        }
    }
    None
}
