use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::applications::domain::{
    ApplicationId, ApplicationSubmission, BusinessApplication, NewBusinessApplication,
};
use crate::applications::store::{ApplicationStore, StoreError, StoreOperation};
use crate::applications::{application_router, ApplicationService};
use crate::config::PromotionConfig;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
pub(super) struct MemoryStore {
    rows: Mutex<Vec<BusinessApplication>>,
    inserts: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub(super) fn rows(&self) -> Vec<BusinessApplication> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn approve(&self, id: &ApplicationId) {
        let mut guard = self.rows.lock().expect("store mutex poisoned");
        if let Some(row) = guard.iter_mut().find(|row| &row.id == id) {
            row.is_approved = Some(true);
        }
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert(
        &self,
        record: NewBusinessApplication,
    ) -> Result<BusinessApplication, StoreError> {
        let sequence = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        let created_at = epoch() + Duration::seconds(sequence as i64);
        let row = BusinessApplication {
            id: ApplicationId(format!("app-{sequence:06}")),
            business_name: record.business_name,
            industry: record.industry,
            email: record.email,
            phone_number: record.phone_number,
            current_situation: record.current_situation,
            goal: record.goal,
            is_approved: None,
            created_at,
            updated_at: created_at,
        };
        self.rows
            .lock()
            .expect("store mutex poisoned")
            .push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<BusinessApplication>, StoreError> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<BusinessApplication, StoreError> {
        self.rows()
            .into_iter()
            .find(|row| &row.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<BusinessApplication>, StoreError> {
        let mut rows: Vec<_> = self
            .rows()
            .into_iter()
            .filter(|row| row.email == email)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn count_approved(&self) -> Result<u64, StoreError> {
        Ok(self.rows().iter().filter(|row| row.approved()).count() as u64)
    }
}

/// Store whose every call fails as if the network were down.
pub(super) struct UnavailableStore;

fn offline(operation: StoreOperation) -> StoreError {
    StoreError::Unavailable {
        operation,
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl ApplicationStore for UnavailableStore {
    async fn insert(
        &self,
        _record: NewBusinessApplication,
    ) -> Result<BusinessApplication, StoreError> {
        Err(offline(StoreOperation::Create))
    }

    async fn list_all(&self) -> Result<Vec<BusinessApplication>, StoreError> {
        Err(offline(StoreOperation::List))
    }

    async fn get_by_id(&self, _id: &ApplicationId) -> Result<BusinessApplication, StoreError> {
        Err(offline(StoreOperation::Fetch))
    }

    async fn list_by_email(&self, _email: &str) -> Result<Vec<BusinessApplication>, StoreError> {
        Err(offline(StoreOperation::List))
    }

    async fn count_approved(&self) -> Result<u64, StoreError> {
        Err(offline(StoreOperation::CountApproved))
    }
}

/// Store reporting a fixed approved count.
pub(super) struct FixedCountStore(pub(super) u64);

#[async_trait]
impl ApplicationStore for FixedCountStore {
    async fn insert(
        &self,
        _record: NewBusinessApplication,
    ) -> Result<BusinessApplication, StoreError> {
        Err(StoreError::Rejected {
            operation: StoreOperation::Create,
            status: 401,
            message: "read only".to_string(),
        })
    }

    async fn list_all(&self) -> Result<Vec<BusinessApplication>, StoreError> {
        Ok(Vec::new())
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<BusinessApplication, StoreError> {
        Err(StoreError::NotFound(id.clone()))
    }

    async fn list_by_email(&self, _email: &str) -> Result<Vec<BusinessApplication>, StoreError> {
        Ok(Vec::new())
    }

    async fn count_approved(&self) -> Result<u64, StoreError> {
        Ok(self.0)
    }
}

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        business_name: Some("Acme".to_string()),
        industry: Some("Retail".to_string()),
        email: Some("  A@B.COM ".to_string()),
        phone_number: None,
        current_situation: Some("none".to_string()),
        goal: Some("leads".to_string()),
    }
}

pub(super) fn build_service() -> (Arc<ApplicationService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(ApplicationService::new(
        store.clone(),
        PromotionConfig::default(),
    ));
    (service, store)
}

pub(super) fn router_with_store<S>(store: S) -> axum::Router
where
    S: ApplicationStore + 'static,
{
    application_router(Arc::new(ApplicationService::new(
        Arc::new(store),
        PromotionConfig::default(),
    )))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
