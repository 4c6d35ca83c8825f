//! Mentor Service Entity
//!
//! A service a mentor offers (research mentorship, career session,
//! group workshop, ...). Booking requests reference a service and
//! snapshot its duration and price at creation time.

use chrono::{DateTime, Utc};
use kernel::id::{MentorId, ServiceTypeId};
use serde::{Deserialize, Serialize};

use crate::error::{SchedulingError, SchedulingResult};

/// A bookable service offering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorService {
    pub id: ServiceTypeId,
    pub mentor_id: MentorId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_minutes: u32,
    /// Price in minor currency units
    pub price_cents: u32,
    /// ISO 4217 currency code
    pub currency: String,
    /// Inactive services cannot receive new booking requests
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentorService {
    pub fn new(
        mentor_id: MentorId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        duration_minutes: u32,
        price_cents: u32,
        currency: impl Into<String>,
    ) -> SchedulingResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "Service title cannot be empty".into(),
            ));
        }
        if duration_minutes == 0 {
            return Err(SchedulingError::Validation(
                "Service duration must be at least 1 minute".into(),
            ));
        }
        let currency = currency.into();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(SchedulingError::Validation(
                "Currency must be a 3-letter ISO code".into(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: ServiceTypeId::new(),
            mentor_id,
            title,
            description: description.into(),
            category: category.into(),
            duration_minutes,
            price_cents,
            currency,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Update the offering details
    pub fn update_details(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        duration_minutes: u32,
        price_cents: u32,
    ) -> SchedulingResult<()> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "Service title cannot be empty".into(),
            ));
        }
        if duration_minutes == 0 {
            return Err(SchedulingError::Validation(
                "Service duration must be at least 1 minute".into(),
            ));
        }
        self.title = title;
        self.description = description.into();
        self.category = category.into();
        self.duration_minutes = duration_minutes;
        self.price_cents = price_cents;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Activate or retire the offering
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validations() {
        let mentor = MentorId::new();
        assert!(MentorService::new(mentor, "", "", "Career", 60, 8500, "USD").is_err());
        assert!(MentorService::new(mentor, "Career Session", "", "Career", 0, 8500, "USD").is_err());
        assert!(MentorService::new(mentor, "Career Session", "", "Career", 60, 8500, "usd").is_err());
        assert!(MentorService::new(mentor, "Career Session", "", "Career", 60, 8500, "USD").is_ok());
    }

    #[test]
    fn test_set_active() {
        let mut service =
            MentorService::new(MentorId::new(), "Workshop", "", "Workshop", 120, 5000, "USD")
                .unwrap();
        assert!(service.is_active);
        service.set_active(false);
        assert!(!service.is_active);
    }
}
