//! Booking Request Entity
//!
//! A student's request to book a mentor's service at a preferred date
//! and time. The request is the state machine of the booking lifecycle;
//! slot capacity is reserved only while it is accepted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use kernel::id::{BookingRequestId, ConversationId, MentorId, ServiceTypeId, StudentId, TimeSlotId};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::booking_status::{BookingStatus, BookingTransition};
use crate::domain::value_object::minute_of_day::MinuteOfDay;
use crate::error::{SchedulingError, SchedulingResult};

/// A booking request
///
/// Duration and price are snapshotted from the service at creation so a
/// later service edit cannot change what the student agreed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: BookingRequestId,
    /// Conversation thread the request was sent in (owned by the
    /// messaging collaborator)
    pub conversation_id: ConversationId,
    pub mentor_id: MentorId,
    pub student_id: StudentId,
    pub service_type_id: ServiceTypeId,
    pub preferred_date: NaiveDate,
    pub preferred_time: MinuteOfDay,
    pub duration_minutes: u32,
    /// Price snapshot in minor currency units
    pub price_cents: u32,
    pub currency: String,
    pub status: BookingStatus,
    /// Occurrence whose capacity this request holds while accepted
    pub assigned_slot: Option<(TimeSlotId, NaiveDate)>,
    pub decline_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversation_id: ConversationId,
        mentor_id: MentorId,
        student_id: StudentId,
        service_type_id: ServiceTypeId,
        preferred_date: NaiveDate,
        preferred_time: MinuteOfDay,
        duration_minutes: u32,
        price_cents: u32,
        currency: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BookingRequestId::new(),
            conversation_id,
            mentor_id,
            student_id,
            service_type_id,
            preferred_date,
            preferred_time,
            duration_minutes,
            price_cents,
            currency: currency.into(),
            status: BookingStatus::Pending,
            assigned_slot: None,
            decline_reason: None,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Instant the session would end, in the mentor's timezone
    pub fn session_end_at(&self) -> NaiveDateTime {
        self.preferred_date
            .and_time(self.preferred_time.to_naive_time())
            + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    fn invalid(&self, attempted: BookingTransition) -> SchedulingError {
        SchedulingError::InvalidTransition {
            current: self.status,
            attempted,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// `Pending -> Accepted`, recording the reserved occurrence
    pub fn accept(&mut self, slot_id: TimeSlotId, date: NaiveDate) -> SchedulingResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(self.invalid(BookingTransition::Accept));
        }
        self.status = BookingStatus::Accepted;
        self.assigned_slot = Some((slot_id, date));
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `Pending -> Declined`
    pub fn decline(&mut self, reason: Option<String>) -> SchedulingResult<()> {
        if self.status != BookingStatus::Pending {
            return Err(self.invalid(BookingTransition::Decline));
        }
        self.status = BookingStatus::Declined;
        self.decline_reason = reason;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `Pending | Accepted -> Cancelled`
    ///
    /// Returns the occurrence whose capacity must be released, if the
    /// request was holding one.
    pub fn cancel(&mut self) -> SchedulingResult<Option<(TimeSlotId, NaiveDate)>> {
        if !matches!(self.status, BookingStatus::Pending | BookingStatus::Accepted) {
            return Err(self.invalid(BookingTransition::Cancel));
        }
        let held = if self.status.holds_capacity() {
            self.assigned_slot
        } else {
            None
        };
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(held)
    }

    /// `Accepted -> Completed`, only once the session has ended
    pub fn complete(&mut self, now: NaiveDateTime) -> SchedulingResult<()> {
        if self.status != BookingStatus::Accepted {
            return Err(self.invalid(BookingTransition::Complete));
        }
        let ends_at = self.session_end_at();
        if now < ends_at {
            return Err(SchedulingError::SessionInProgress(ends_at));
        }
        self.status = BookingStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookingRequest {
        BookingRequest::new(
            ConversationId::new(),
            MentorId::new(),
            StudentId::new(),
            ServiceTypeId::new(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            "10:00".parse().unwrap(),
            60,
            8500,
            "USD",
            None,
        )
    }

    fn after_session() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_accept_from_pending() {
        let mut request = request();
        let slot_id = TimeSlotId::new();
        request.accept(slot_id, request.preferred_date).unwrap();
        assert_eq!(request.status, BookingStatus::Accepted);
        assert_eq!(request.assigned_slot, Some((slot_id, request.preferred_date)));
    }

    #[test]
    fn test_decline_records_reason() {
        let mut request = request();
        request.decline(Some("Family emergency".into())).unwrap();
        assert_eq!(request.status, BookingStatus::Declined);
        assert_eq!(request.decline_reason.as_deref(), Some("Family emergency"));
    }

    #[test]
    fn test_cancel_from_pending_releases_nothing() {
        let mut request = request();
        assert_eq!(request.cancel().unwrap(), None);
        assert_eq!(request.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_cancel_from_accepted_releases_occurrence() {
        let mut request = request();
        let slot_id = TimeSlotId::new();
        request.accept(slot_id, request.preferred_date).unwrap();
        assert_eq!(
            request.cancel().unwrap(),
            Some((slot_id, request.preferred_date))
        );
    }

    #[test]
    fn test_complete_only_after_session_end() {
        let mut request = request();
        request.accept(TimeSlotId::new(), request.preferred_date).unwrap();

        let mid_session = after_session() - chrono::Duration::minutes(90);
        assert!(matches!(
            request.complete(mid_session),
            Err(SchedulingError::SessionInProgress(_))
        ));
        assert_eq!(request.status, BookingStatus::Accepted);

        request.complete(after_session()).unwrap();
        assert_eq!(request.status, BookingStatus::Completed);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [
            BookingStatus::Declined,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let mut request = request();
            request.status = terminal;
            assert!(request.accept(TimeSlotId::new(), request.preferred_date).is_err());
            assert!(request.decline(None).is_err());
            assert!(request.cancel().is_err());
            assert!(request.complete(after_session()).is_err());
            assert_eq!(request.status, terminal);
        }
    }

    #[test]
    fn test_session_end_at() {
        let request = request();
        assert_eq!(
            request.session_end_at(),
            NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap()
        );
    }
}
