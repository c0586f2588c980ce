use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier wrapper for stored applications, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row of the `business_applications` table as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessApplication {
    pub id: ApplicationId,
    pub business_name: String,
    pub industry: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub current_situation: String,
    pub goal: String,
    #[serde(default)]
    pub is_approved: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessApplication {
    /// Unset approval counts as not approved.
    pub fn approved(&self) -> bool {
        self.is_approved.unwrap_or(false)
    }
}

/// Validated, normalized insert payload. Only produced by [`super::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBusinessApplication {
    pub business_name: String,
    pub industry: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub current_situation: String,
    pub goal: String,
}

/// Form payload as posted by the landing page.
///
/// Fields are optional here so that absence and wrong JSON types surface as validation
/// failures naming the field instead of deserialization errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(default, deserialize_with = "string_or_none")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub current_situation: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub goal: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}

/// Approved-application count and the remaining promotion capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub count: u64,
    pub spots_left: u64,
}

impl Availability {
    pub fn from_count(count: u64, capacity: u64) -> Self {
        Self {
            count,
            spots_left: capacity.saturating_sub(count),
        }
    }
}
