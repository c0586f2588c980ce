//! Intake backend for the free website promotion.
//!
//! Business applications arrive over HTTP, are validated and normalized, and are stored in a
//! hosted Supabase table. The same table backs the "spots left" indicator on the landing page.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
