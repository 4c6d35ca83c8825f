//! Booking Status Value Objects
//!
//! Lifecycle vocabulary for booking requests.
//!
//! ## State machine
//! - `Pending -> Accepted | Declined`
//! - `Accepted -> Completed | Cancelled`
//! - `Pending -> Cancelled` (either party backs out before a decision)
//! - `Declined`, `Completed`, `Cancelled` are terminal
//!
//! The transitions themselves are enforced by the `BookingRequest`
//! entity; this module only defines the vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// BookingStatus
// ============================================================================

/// Status of a booking request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BookingStatus {
    /// Waiting for the mentor's decision
    #[default]
    Pending = 0,
    /// Accepted by the mentor; slot capacity is reserved
    Accepted = 1,
    /// Declined by the mentor
    Declined = 2,
    /// Session took place and has been marked complete
    Completed = 3,
    /// Cancelled by either party
    Cancelled = 4,
}

impl BookingStatus {
    /// Get numeric ID for storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Look up a status by its string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transitions
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Completed | Self::Cancelled)
    }

    /// Whether a request in this status holds reserved slot capacity
    #[inline]
    pub const fn holds_capacity(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// BookingTransition
// ============================================================================

/// The transitions a caller can attempt on a booking request
///
/// Carried inside invalid-transition errors so the caller can see both
/// the current status and what was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingTransition {
    Accept,
    Decline,
    Cancel,
    Complete,
}

impl BookingTransition {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for BookingTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Accepted,
            BookingStatus::Declined,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(BookingStatus::from_code("unknown"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Accepted.is_terminal());
        assert!(BookingStatus::Declined.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_holds_capacity() {
        assert!(BookingStatus::Accepted.holds_capacity());
        assert!(!BookingStatus::Pending.holds_capacity());
        assert!(!BookingStatus::Cancelled.holds_capacity());
    }

    #[test]
    fn test_display() {
        assert_eq!(BookingStatus::Pending.to_string(), "pending");
        assert_eq!(BookingTransition::Complete.to_string(), "complete");
    }
}
