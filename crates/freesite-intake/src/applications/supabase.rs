//! PostgREST client for the Supabase-hosted `business_applications` table.
//!
//! Requests go to `<SUPABASE_URL>/rest/v1/<table>` authenticated with the project's anon key,
//! sent both as `apikey` and as a bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::domain::{ApplicationId, BusinessApplication, NewBusinessApplication};
use super::store::{ApplicationStore, StoreError, StoreOperation};
use crate::config::{ConfigError, StoreConfig};

const REST_PATH: &str = "rest/v1";

/// Supabase store client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct SupabaseStore {
    inner: Arc<SupabaseStoreInner>,
}

struct SupabaseStoreInner {
    client: reqwest::Client,
    endpoint: Url,
}

/// Error payload returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    code: Option<String>,
}

impl SupabaseStore {
    /// Build the client once at startup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the key is not a valid header value, the table endpoint
    /// cannot be derived from the URL, or the HTTP client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, ConfigError> {
        let key = config.access_key.expose_secret();

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidAccessKey)?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| ConfigError::InvalidAccessKey)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::StoreClient)?;

        Ok(Self {
            inner: Arc::new(SupabaseStoreInner {
                client,
                endpoint: table_endpoint(&config.url, &config.table)?,
            }),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    async fn select(
        &self,
        operation: StoreOperation,
        query: &[(&str, &str)],
    ) -> Result<Vec<BusinessApplication>, StoreError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .query(query)
            .send()
            .await
            .map_err(|err| unavailable(operation, err))?;

        decode(operation, response).await
    }
}

#[async_trait]
impl ApplicationStore for SupabaseStore {
    async fn insert(
        &self,
        record: NewBusinessApplication,
    ) -> Result<BusinessApplication, StoreError> {
        let operation = StoreOperation::Create;
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(|err| unavailable(operation, err))?;

        let rows: Vec<BusinessApplication> = decode(operation, response).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Decode {
            operation,
            message: "insert returned no rows".to_string(),
        })
    }

    async fn list_all(&self) -> Result<Vec<BusinessApplication>, StoreError> {
        self.select(
            StoreOperation::List,
            &[("select", "*"), ("order", "created_at.desc")],
        )
        .await
    }

    async fn get_by_id(&self, id: &ApplicationId) -> Result<BusinessApplication, StoreError> {
        let filter = format!("eq.{}", id.0);
        let rows = self
            .select(StoreOperation::Fetch, &[("select", "*"), ("id", filter.as_str())])
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<BusinessApplication>, StoreError> {
        let filter = format!("eq.{email}");
        self.select(
            StoreOperation::List,
            &[
                ("select", "*"),
                ("email", filter.as_str()),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    async fn count_approved(&self) -> Result<u64, StoreError> {
        let operation = StoreOperation::CountApproved;
        let response = self
            .inner
            .client
            .head(self.inner.endpoint.clone())
            .header("Prefer", "count=exact")
            .query(&[("select", "*"), ("is_approved", "eq.true")])
            .send()
            .await
            .map_err(|err| unavailable(operation, err))?;

        if !response.status().is_success() {
            return Err(rejected(operation, response).await);
        }

        Ok(response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(content_range_total)
            .unwrap_or(0))
    }
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

fn table_endpoint(base: &Url, table: &str) -> Result<Url, ConfigError> {
    let mut base = base.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("{REST_PATH}/{table}"))
        .map_err(|_| ConfigError::InvalidStoreUrl {
            value: base.to_string(),
        })
}

/// Total from a PostgREST `Content-Range` header (`0-24/310`, `*/0`). `None` when the
/// store did not count (`0-24/*`).
fn content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

async fn decode<T: DeserializeOwned>(
    operation: StoreOperation,
    response: reqwest::Response,
) -> Result<T, StoreError> {
    if !response.status().is_success() {
        return Err(rejected(operation, response).await);
    }

    response.json().await.map_err(|err| StoreError::Decode {
        operation,
        message: err.to_string(),
    })
}

async fn rejected(operation: StoreOperation, response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<PostgrestError>(&body) {
        Ok(PostgrestError {
            message: Some(message),
            code,
        }) if !message.trim().is_empty() => match code {
            Some(code) => format!("{message} ({code})"),
            None => message,
        },
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("HTTP {status}"),
    };

    StoreError::Rejected {
        operation,
        status,
        message,
    }
}

fn unavailable(operation: StoreOperation, err: reqwest::Error) -> StoreError {
    let message = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    StoreError::Unavailable { operation, message }
}
