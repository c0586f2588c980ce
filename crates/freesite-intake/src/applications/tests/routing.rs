use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::applications::router::{count_handler, submit_handler};

fn post_json(body: Value) -> Request<Body> {
    Request::post("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
        .expect("request")
}

fn complete_body() -> Value {
    json!({
        "businessName": "Acme",
        "industry": "Retail",
        "email": "  A@B.COM ",
        "currentSituation": "none",
        "goal": "leads",
    })
}

#[tokio::test]
async fn submit_route_creates_record() {
    let (service, store) = build_service();
    let router = crate::applications::application_router(service);

    let response = router
        .oneshot(post_json(complete_body()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["message"], json!("Application submitted successfully"));
    assert_eq!(payload["data"]["email"], json!("a@b.com"));
    assert_eq!(payload["data"]["phone_number"], Value::Null);
    assert_eq!(payload["data"]["business_name"], json!("Acme"));
    assert!(payload["data"]["id"].is_string());
    assert_eq!(store.insert_calls(), 1);
}

#[tokio::test]
async fn submit_route_names_missing_field() {
    let (service, store) = build_service();
    let router = crate::applications::application_router(service);

    let mut body = complete_body();
    body.as_object_mut().expect("object").remove("goal");
    let response = router.oneshot(post_json(body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Missing required field: goal" }));
    assert_eq!(store.insert_calls(), 0);
}

#[tokio::test]
async fn submit_route_treats_whitespace_and_wrong_types_as_missing() {
    for (field, value) in [
        ("businessName", json!("   ")),
        ("industry", json!(12)),
        ("currentSituation", json!(null)),
        ("email", json!(false)),
    ] {
        let (service, store) = build_service();
        let router = crate::applications::application_router(service);
        let mut body = complete_body();
        body[field] = value;

        let response = router.oneshot(post_json(body)).await.expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["error"],
            json!(format!("Missing required field: {field}"))
        );
        assert_eq!(store.insert_calls(), 0);
    }
}

#[tokio::test]
async fn submit_route_rejects_invalid_email() {
    let (service, store) = build_service();
    let router = crate::applications::application_router(service);
    let mut body = complete_body();
    body["email"] = json!("owner@localhost");

    let response = router.oneshot(post_json(body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Invalid email format" }));
    assert_eq!(store.insert_calls(), 0);
}

#[tokio::test]
async fn submit_route_rejects_unreadable_body() {
    let (service, store) = build_service();
    let router = crate::applications::application_router(service);

    let request = Request::post("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Invalid request body"));
    assert!(payload["details"].is_string());
    assert_eq!(store.insert_calls(), 0);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_store_failure() {
    let service = std::sync::Arc::new(crate::applications::ApplicationService::new(
        std::sync::Arc::new(UnavailableStore),
        crate::config::PromotionConfig::default(),
    ));

    let response = submit_handler::<UnavailableStore>(State(service), Ok(Json(submission()))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        json!("Failed to submit application. Please try again.")
    );
    assert_eq!(
        payload["details"],
        json!("failed to create business application: store unavailable: connection refused")
    );
}

#[tokio::test]
async fn collection_get_is_not_allowed() {
    let router = router_with_store(FixedCountStore(0));

    let response = router
        .oneshot(
            Request::get("/api/applications")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn count_route_reports_spots_left() {
    let router = router_with_store(FixedCountStore(3));

    let response = router
        .oneshot(
            Request::get("/api/applications/count")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "success": true, "count": 3, "spotsLeft": 7 }));
}

#[tokio::test]
async fn count_handler_clamps_and_handles_zero() {
    for (count, spots_left) in [(0u64, 10u64), (10, 0), (15, 0)] {
        let service = std::sync::Arc::new(crate::applications::ApplicationService::new(
            std::sync::Arc::new(FixedCountStore(count)),
            crate::config::PromotionConfig::default(),
        ));
        let response = count_handler::<FixedCountStore>(State(service)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["count"], json!(count));
        assert_eq!(payload["spotsLeft"], json!(spots_left));
    }
}

#[tokio::test]
async fn count_route_returns_internal_error_on_store_failure() {
    let router = router_with_store(UnavailableStore);

    let response = router
        .oneshot(
            Request::get("/api/applications/count")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Failed to fetch count"));
    assert!(payload["details"]
        .as_str()
        .unwrap_or_default()
        .contains("approved applications count"));
}
