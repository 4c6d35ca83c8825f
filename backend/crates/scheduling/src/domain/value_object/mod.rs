//! Value Object Module

pub mod advance_window;
pub mod booking_status;
pub mod buffer_time;
pub mod minute_of_day;
pub mod timezone;
