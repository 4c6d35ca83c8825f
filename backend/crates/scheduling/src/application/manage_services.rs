//! Manage Services Use Case
//!
//! Mentor-facing CRUD for the service catalog. Retiring a service
//! stops new booking requests; existing requests keep their snapshots.

use std::sync::Arc;

use kernel::id::{MentorId, ServiceTypeId};
use platform::sync::KeyedMutex;

use crate::domain::entity::mentor_service::MentorService;
use crate::domain::repository::ServiceCatalogRepository;
use crate::error::{SchedulingError, SchedulingResult};

/// Input DTO for service creation and edits
#[derive(Debug, Clone)]
pub struct ServiceDetailsInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_minutes: u32,
    pub price_cents: u32,
}

/// Manage services use case
pub struct ManageServicesUseCase<V>
where
    V: ServiceCatalogRepository,
{
    service_repo: Arc<V>,
    mentor_gate: Arc<KeyedMutex<MentorId>>,
}

impl<V> ManageServicesUseCase<V>
where
    V: ServiceCatalogRepository,
{
    pub fn new(service_repo: Arc<V>, mentor_gate: Arc<KeyedMutex<MentorId>>) -> Self {
        Self {
            service_repo,
            mentor_gate,
        }
    }

    /// Publish a new service offering
    pub async fn create_service(
        &self,
        mentor_id: MentorId,
        details: ServiceDetailsInput,
        currency: String,
    ) -> SchedulingResult<MentorService> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let service = MentorService::new(
            mentor_id,
            details.title,
            details.description,
            details.category,
            details.duration_minutes,
            details.price_cents,
            currency,
        )?;
        self.service_repo.create(&service).await?;

        tracing::info!(
            service_id = %service.id,
            mentor_id = %mentor_id,
            title = %service.title,
            "Service created"
        );
        Ok(service)
    }

    /// Update an offering's details
    pub async fn update_service(
        &self,
        mentor_id: MentorId,
        service_id: ServiceTypeId,
        details: ServiceDetailsInput,
    ) -> SchedulingResult<MentorService> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut service = self.load_owned(&mentor_id, &service_id).await?;
        service.update_details(
            details.title,
            details.description,
            details.category,
            details.duration_minutes,
            details.price_cents,
        )?;
        self.service_repo.update(&service).await?;

        tracing::info!(service_id = %service_id, mentor_id = %mentor_id, "Service updated");
        Ok(service)
    }

    /// Open or close an offering for new bookings
    pub async fn set_active(
        &self,
        mentor_id: MentorId,
        service_id: ServiceTypeId,
        is_active: bool,
    ) -> SchedulingResult<MentorService> {
        let _guard = self.mentor_gate.lock(&mentor_id).await;

        let mut service = self.load_owned(&mentor_id, &service_id).await?;
        service.set_active(is_active);
        self.service_repo.update(&service).await?;

        tracing::info!(
            service_id = %service_id,
            mentor_id = %mentor_id,
            is_active,
            "Service availability changed"
        );
        Ok(service)
    }

    async fn load_owned(
        &self,
        mentor_id: &MentorId,
        service_id: &ServiceTypeId,
    ) -> SchedulingResult<MentorService> {
        self.service_repo
            .find_by_id(service_id)
            .await?
            .filter(|service| service.mentor_id == *mentor_id)
            .ok_or(SchedulingError::ServiceNotFound(*service_id))
    }
}
