//! Clock Abstraction
//!
//! Domain decisions that depend on "now" (booking windows, session
//! completion) read it from an injected [`Clock`] instead of the system
//! time, so they can be tested deterministically.

use chrono::{Duration, Local, NaiveDateTime};
use std::sync::Mutex;

/// Source of the current civil time
///
/// Times are naive on purpose: the scheduling core does all of its
/// date math in the schedule owner's timezone, and the caller is
/// responsible for supplying times in that zone.
pub trait Clock: Send + Sync {
    /// Current civil time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: NaiveDateTime) {
        *self.now.lock().expect("clock mutex poisoned") = instant;
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::new(instant());
        assert_eq!(clock.now(), instant());
        assert_eq!(clock.now(), instant());
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(instant());
        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), instant() + Duration::minutes(90));
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::new(instant());
        let later = instant() + Duration::days(3);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
