//! Advance-Booking Window Value Object
//!
//! How many days into the future a booking may be made. Also bounds the
//! horizon used to materialize recurring slot occurrences.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum days in advance a booking may be made, `1..=90`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AdvanceBookingDays(u8);

impl AdvanceBookingDays {
    pub const DEFAULT: AdvanceBookingDays = AdvanceBookingDays(30);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 90;

    pub fn new(days: u8) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Some(Self(days))
        } else {
            None
        }
    }

    #[inline]
    pub const fn days(&self) -> u8 {
        self.0
    }

    /// Window length as a chrono duration
    pub fn duration(&self) -> Duration {
        Duration::days(self.0 as i64)
    }
}

impl Default for AdvanceBookingDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AdvanceBookingDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl TryFrom<u8> for AdvanceBookingDays {
    type Error = String;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        Self::new(days).ok_or_else(|| {
            format!(
                "Advance booking window must be between {} and {} days",
                Self::MIN,
                Self::MAX
            )
        })
    }
}

impl From<AdvanceBookingDays> for u8 {
    fn from(value: AdvanceBookingDays) -> Self {
        value.0
    }
}
