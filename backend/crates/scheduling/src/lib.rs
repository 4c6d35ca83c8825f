//! Scheduling Backend Module (mentoring platform)
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - In-memory store and event fan-out
//!
//! ## Scheduling Model
//! - A mentor's weekly working hours and booking policy live in one
//!   `AvailabilityPolicy`, the source of truth for every booking decision
//! - Time slots are one-off or recurring; recurring slots materialize one
//!   occurrence per matching weekday within the advance-booking horizon,
//!   and capacity is tracked per occurrence
//! - Booking requests move through `pending -> accepted | declined`,
//!   `accepted -> completed | cancelled`; capacity is reserved only while
//!   a request is accepted
//!
//! ## Concurrency Model
//! - All mutations of one mentor's data serialize through a per-mentor
//!   gate; `reserve` is additionally a compare-and-increment inside the
//!   store, so a slot never exceeds `max_bookings` seats per occurrence
//! - The core performs no I/O and runs no timers; "now" comes from an
//!   injected clock

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::SchedulingConfig;
pub use error::{SchedulingError, SchedulingResult};
pub use infra::memory::InMemoryScheduleStore;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::availability::*;
    pub use crate::domain::entity::booking_request::*;
    pub use crate::domain::entity::mentor_service::*;
    pub use crate::domain::entity::time_slot::*;
    pub use crate::domain::value_object::advance_window::*;
    pub use crate::domain::value_object::booking_status::*;
    pub use crate::domain::value_object::buffer_time::*;
    pub use crate::domain::value_object::minute_of_day::*;
    pub use crate::domain::value_object::timezone::*;
}

pub mod events {
    pub use crate::domain::event::*;
    pub use crate::infra::broadcast::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryScheduleStore as ScheduleStore;
}
