//! Buffer Time Value Object
//!
//! Minimum gap enforced between adjacent sessions. Restricted to a small
//! enumerated set so the UI can offer fixed choices and overlap checks
//! stay predictable.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gap between adjacent slots, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BufferTime {
    /// Back-to-back sessions allowed
    None = 0,
    #[default]
    Fifteen = 15,
    Thirty = 30,
    Sixty = 60,
}

impl BufferTime {
    /// Buffer length in minutes
    #[inline]
    pub const fn minutes(&self) -> u8 {
        *self as u8
    }

    /// Look up a buffer by its minute count
    #[inline]
    pub fn from_minutes(minutes: u8) -> Option<Self> {
        match minutes {
            0 => Some(Self::None),
            15 => Some(Self::Fifteen),
            30 => Some(Self::Thirty),
            60 => Some(Self::Sixty),
            _ => None,
        }
    }

    /// Buffer length as a chrono duration
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes() as i64)
    }
}

impl fmt::Display for BufferTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minutes() {
        assert_eq!(BufferTime::from_minutes(0), Some(BufferTime::None));
        assert_eq!(BufferTime::from_minutes(15), Some(BufferTime::Fifteen));
        assert_eq!(BufferTime::from_minutes(30), Some(BufferTime::Thirty));
        assert_eq!(BufferTime::from_minutes(60), Some(BufferTime::Sixty));
        assert_eq!(BufferTime::from_minutes(45), None);
    }

    #[test]
    fn test_duration() {
        assert_eq!(BufferTime::Fifteen.duration(), Duration::minutes(15));
        assert_eq!(BufferTime::None.duration(), Duration::zero());
    }
}
