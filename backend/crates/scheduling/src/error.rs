//! Scheduling Error Types
//!
//! This module provides scheduling-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use chrono::NaiveDateTime;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::{BookingRequestId, MentorId, ServiceTypeId, TimeSlotId};
use thiserror::Error;

use crate::domain::value_object::booking_status::{BookingStatus, BookingTransition};

/// Scheduling-specific result type alias
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Scheduling-specific error variants
///
/// These are domain-specific errors that map to appropriate HTTP status
/// codes and can be converted to `AppError` for unified error handling.
/// Every variant is recoverable; the calling layer decides how to surface
/// it and whether to retry with different input.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Malformed input (bad time range, out-of-bounds policy value, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// New or edited slot collides with an existing slot occurrence
    #[error("Time slot overlaps slot {existing_slot_id} on {date}")]
    Overlap {
        existing_slot_id: TimeSlotId,
        date: chrono::NaiveDate,
    },

    /// Reserve attempted on a fully booked occurrence
    #[error("Slot {slot_id} is fully booked on {date}")]
    Capacity {
        slot_id: TimeSlotId,
        date: chrono::NaiveDate,
    },

    /// Structural constraint violation (shrinking capacity below current
    /// reservations, deleting a slot with active bookings, ...)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No availability policy exists for the mentor
    #[error("Availability policy not found for mentor {0}")]
    PolicyNotFound(MentorId),

    /// Unknown time slot id
    #[error("Time slot {0} not found")]
    SlotNotFound(TimeSlotId),

    /// Unknown booking request id
    #[error("Booking request {0} not found")]
    BookingNotFound(BookingRequestId),

    /// Unknown or foreign service id
    #[error("Service {0} not found")]
    ServiceNotFound(ServiceTypeId),

    /// Illegal state-machine transition; carries the current status and
    /// the attempted transition for diagnostics
    #[error("Cannot {attempted} a booking request that is {current}")]
    InvalidTransition {
        current: BookingStatus,
        attempted: BookingTransition,
    },

    /// Completion attempted before the session has ended
    #[error("Session has not finished yet (ends at {0})")]
    SessionInProgress(NaiveDateTime),
}

impl SchedulingError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchedulingError::Validation(_) => ErrorKind::BadRequest,
            SchedulingError::Overlap { .. }
            | SchedulingError::Capacity { .. }
            | SchedulingError::Conflict(_)
            | SchedulingError::InvalidTransition { .. }
            | SchedulingError::SessionInProgress(_) => ErrorKind::Conflict,
            SchedulingError::PolicyNotFound(_)
            | SchedulingError::SlotNotFound(_)
            | SchedulingError::BookingNotFound(_)
            | SchedulingError::ServiceNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}
