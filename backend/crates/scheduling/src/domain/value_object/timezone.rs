//! Timezone Value Object
//!
//! An IANA-style timezone identifier (`America/New_York`, `UTC`, ...).
//! Shape validation only - the core does its civil-time math in the
//! mentor's zone and never converts between zones, so a tz database
//! lookup is left to the display/storage collaborators.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length (longest IANA names are well under this)
const TIMEZONE_MAX_LENGTH: usize = 64;

/// Validated timezone identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timezone(String);

impl Timezone {
    /// Create a new timezone identifier with shape validation
    pub fn new(identifier: impl Into<String>) -> AppResult<Self> {
        let identifier = identifier.into().trim().to_string();

        if identifier.is_empty() {
            return Err(AppError::bad_request("Timezone cannot be empty"));
        }

        if identifier.len() > TIMEZONE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Timezone must be at most {} characters",
                TIMEZONE_MAX_LENGTH
            )));
        }

        if !identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'))
        {
            return Err(AppError::bad_request("Invalid timezone identifier"));
        }

        Ok(Self(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
