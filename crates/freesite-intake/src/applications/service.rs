use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ApplicationId, ApplicationSubmission, Availability, BusinessApplication};
use super::store::{ApplicationStore, StoreError};
use super::validation::{normalize_email, validate, ValidationError};
use crate::config::PromotionConfig;

/// Service composing validation with the injected store client.
pub struct ApplicationService<S> {
    store: Arc<S>,
    promotion: PromotionConfig,
}

impl<S> ApplicationService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>, promotion: PromotionConfig) -> Self {
        Self { store, promotion }
    }

    pub fn capacity(&self) -> u64 {
        self.promotion.capacity
    }

    /// Validate and persist a new application.
    ///
    /// Validation runs before the store is touched, so a rejected submission never writes.
    /// There is no idempotency key: resubmitting the same form stores a second row.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<BusinessApplication, ApplicationServiceError> {
        let record = validate(submission).inspect_err(|err| {
            warn!(reason = %err, "application rejected");
        })?;

        let stored = self.store.insert(record).await?;
        info!(application_id = %stored.id, "application stored");
        Ok(stored)
    }

    /// Approved count and remaining promotion spots.
    pub async fn availability(&self) -> Result<Availability, ApplicationServiceError> {
        let count = self.store.count_approved().await?;
        Ok(Availability::from_count(count, self.promotion.capacity))
    }

    pub async fn list(&self) -> Result<Vec<BusinessApplication>, ApplicationServiceError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<BusinessApplication, ApplicationServiceError> {
        Ok(self.store.get_by_id(application_id).await?)
    }

    /// Lookup applies the same normalization as submission.
    pub async fn by_email(
        &self,
        email: &str,
    ) -> Result<Vec<BusinessApplication>, ApplicationServiceError> {
        Ok(self.store.list_by_email(&normalize_email(email)).await?)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
