use std::sync::LazyLock;

use regex::Regex;

use super::domain::{ApplicationSubmission, NewBusinessApplication};

/// Loose `local@domain.tld` shape check, not RFC 5322.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Rejections raised before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Checks a submission and maps it onto the storage shape.
///
/// Required fields are checked in form order, so the first offending field is reported.
/// Only `email` and `phoneNumber` are rewritten; the remaining fields are stored exactly as
/// submitted once they are known to hold more than whitespace.
pub fn validate(
    submission: ApplicationSubmission,
) -> Result<NewBusinessApplication, ValidationError> {
    let ApplicationSubmission {
        business_name,
        industry,
        email,
        phone_number,
        current_situation,
        goal,
    } = submission;

    let business_name = required("businessName", business_name)?;
    let industry = required("industry", industry)?;
    let email = required("email", email)?;
    let current_situation = required("currentSituation", current_situation)?;
    let goal = required("goal", goal)?;

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewBusinessApplication {
        business_name,
        industry,
        email,
        phone_number: normalize_phone(phone_number),
        current_situation,
        goal,
    })
}

/// Lower-cased, trimmed form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
