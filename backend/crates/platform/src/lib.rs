//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Injectable clock (civil-time source for domain decisions)
//! - Keyed async locking (per-owner write serialization)

pub mod clock;
pub mod sync;
