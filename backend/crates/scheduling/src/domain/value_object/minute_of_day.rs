//! Minute-of-Day Value Object
//!
//! A clock time within a single day, stored as minutes since midnight.
//! Working hours and slot boundaries are always whole minutes, so this
//! is exact where an `HH:MM` string would need re-parsing everywhere.

use chrono::{NaiveTime, Timelike};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes since midnight, `0..=1439`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// Last valid minute of a day (23:59)
    pub const MAX: u16 = 1439;

    /// Midnight
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);

    /// Create from raw minutes since midnight
    pub fn new(minutes: u16) -> AppResult<Self> {
        if minutes > Self::MAX {
            return Err(AppError::bad_request(format!(
                "Minute of day must be at most {}",
                Self::MAX
            )));
        }
        Ok(Self(minutes))
    }

    /// Create from an hour/minute pair
    pub fn from_hm(hour: u16, minute: u16) -> AppResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(AppError::bad_request("Invalid hour or minute"));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Create from a chrono clock time (seconds are dropped)
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    #[inline]
    pub const fn minutes(&self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn hour(&self) -> u16 {
        self.0 / 60
    }

    #[inline]
    pub const fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Convert to a chrono clock time
    pub fn to_naive_time(self) -> NaiveTime {
        // Always in range: 0..=1439 minutes never wraps past midnight
        NaiveTime::MIN + chrono::Duration::minutes(self.0 as i64)
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinuteOfDay {
    type Err = AppError;

    /// Parse an `HH:MM` string
    fn from_str(s: &str) -> AppResult<Self> {
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| AppError::bad_request("Time must be in HH:MM format"))?;
        let hour: u16 = hours
            .parse()
            .map_err(|_| AppError::bad_request("Time must be in HH:MM format"))?;
        let minute: u16 = minutes
            .parse()
            .map_err(|_| AppError::bad_request("Time must be in HH:MM format"))?;
        Self::from_hm(hour, minute)
    }
}

impl TryFrom<String> for MinuteOfDay {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        value.parse()
    }
}

impl From<MinuteOfDay> for String {
    fn from(value: MinuteOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bounds() {
        assert!(MinuteOfDay::new(0).is_ok());
        assert!(MinuteOfDay::new(1439).is_ok());
        assert!(MinuteOfDay::new(1440).is_err());
    }

    #[test]
    fn test_from_hm() {
        let t = MinuteOfDay::from_hm(9, 30).unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 30);
        assert!(MinuteOfDay::from_hm(24, 0).is_err());
        assert!(MinuteOfDay::from_hm(10, 60).is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let t: MinuteOfDay = "09:05".parse().unwrap();
        assert_eq!(t.to_string(), "09:05");
        assert!("9".parse::<MinuteOfDay>().is_err());
        assert!("ab:cd".parse::<MinuteOfDay>().is_err());
        assert!("25:00".parse::<MinuteOfDay>().is_err());
    }

    #[test]
    fn test_ordering() {
        let morning: MinuteOfDay = "09:00".parse().unwrap();
        let evening: MinuteOfDay = "17:00".parse().unwrap();
        assert!(morning < evening);
    }

    #[test]
    fn test_to_naive_time() {
        let t = MinuteOfDay::from_hm(14, 45).unwrap();
        assert_eq!(t.to_naive_time(), NaiveTime::from_hms_opt(14, 45, 0).unwrap());
    }
}
