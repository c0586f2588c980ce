use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::ApplicationSubmission;
use super::service::{ApplicationService, ApplicationServiceError};
use super::store::ApplicationStore;

pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit application. Please try again.";
pub const COUNT_FAILED_MESSAGE: &str = "Failed to fetch count";

/// Router exposing the intake form endpoint and the spots-left counter.
pub fn application_router<S>(service: Arc<ApplicationService<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            post(submit_handler::<S>).get(method_not_allowed),
        )
        .route("/api/applications/count", get(count_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    payload: Result<Json<ApplicationSubmission>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "unreadable application payload");
            let payload = json!({
                "error": "Invalid request body",
                "details": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(submission).await {
        Ok(record) => {
            let payload = json!({
                "success": true,
                "message": SUBMITTED_MESSAGE,
                "data": record,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Store(err)) => {
            error!(error = %err, "error submitting application");
            let payload = json!({
                "error": SUBMIT_FAILED_MESSAGE,
                "details": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn count_handler<S>(State(service): State<Arc<ApplicationService<S>>>) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.availability().await {
        Ok(availability) => {
            let payload = json!({
                "success": true,
                "count": availability.count,
                "spotsLeft": availability.spots_left,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "error fetching approved applications count");
            let payload = json!({
                "error": COUNT_FAILED_MESSAGE,
                "details": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Reads on the collection path are rejected.
pub(crate) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
