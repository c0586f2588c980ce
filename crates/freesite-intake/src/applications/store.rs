use std::fmt;

use async_trait::async_trait;

use super::domain::{ApplicationId, BusinessApplication, NewBusinessApplication};

/// Storage abstraction over the single `business_applications` table.
///
/// Implementations are straight pass-throughs: one call, one store round trip, no retries.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(
        &self,
        record: NewBusinessApplication,
    ) -> Result<BusinessApplication, StoreError>;

    /// Every row, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<BusinessApplication>, StoreError>;

    async fn get_by_id(&self, id: &ApplicationId) -> Result<BusinessApplication, StoreError>;

    /// Exact match on the stored (already normalized) email, newest first.
    async fn list_by_email(&self, email: &str) -> Result<Vec<BusinessApplication>, StoreError>;

    /// Rows with `is_approved = true`. Zero when the store reports no count.
    async fn count_approved(&self) -> Result<u64, StoreError>;
}

/// Store round trip being attempted, used to prefix error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Create,
    List,
    Fetch,
    CountApproved,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreOperation::Create => "create business application",
            StoreOperation::List => "fetch business applications",
            StoreOperation::Fetch => "fetch business application",
            StoreOperation::CountApproved => "fetch approved applications count",
        };
        f.write_str(label)
    }
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Lookup by id matched no row. Callers wanting the older "any failure" behavior can
    /// treat this like the other variants.
    #[error("business application {0} not found")]
    NotFound(ApplicationId),
    #[error("failed to {operation}: {message}")]
    Rejected {
        operation: StoreOperation,
        status: u16,
        message: String,
    },
    #[error("failed to {operation}: store unavailable: {message}")]
    Unavailable {
        operation: StoreOperation,
        message: String,
    },
    #[error("failed to {operation}: unexpected response: {message}")]
    Decode {
        operation: StoreOperation,
        message: String,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
