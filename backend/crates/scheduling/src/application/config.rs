//! Application Configuration
//!
//! Defaults applied when a mentor's policy is first created. Everything
//! here can be changed per mentor afterwards through the availability
//! use case.

use crate::domain::value_object::advance_window::AdvanceBookingDays;
use crate::domain::value_object::buffer_time::BufferTime;
use crate::domain::value_object::minute_of_day::MinuteOfDay;

/// Scheduling application configuration
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Advance-booking window for new policies
    pub default_advance_booking_days: AdvanceBookingDays,
    /// Buffer between sessions for new policies
    pub default_buffer_time: BufferTime,
    /// Cancellation policy text for new policies
    pub default_cancellation_policy: String,
    /// Daily working-hour template start for new policies
    pub default_working_start: MinuteOfDay,
    /// Daily working-hour template end for new policies
    pub default_working_end: MinuteOfDay,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_advance_booking_days: AdvanceBookingDays::DEFAULT,
            default_buffer_time: BufferTime::Fifteen,
            default_cancellation_policy:
                "Free cancellation up to 24 hours before the session.".to_string(),
            default_working_start: MinuteOfDay::from_hm(9, 0)
                .expect("09:00 is a valid minute of day"),
            default_working_end: MinuteOfDay::from_hm(17, 0)
                .expect("17:00 is a valid minute of day"),
        }
    }
}
