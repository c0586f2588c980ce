//! Business application intake: validation, storage, and the two public endpoints.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;
pub mod supabase;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationSubmission, Availability, BusinessApplication,
    NewBusinessApplication,
};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
pub use store::{ApplicationStore, StoreError, StoreOperation};
pub use supabase::SupabaseStore;
pub use validation::{validate, ValidationError};
