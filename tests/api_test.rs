//! HTTP API integration tests
//!
//! Drives the router directly without binding a socket. Trip counts depend
//! on the wall clock, so assertions check consistency between the returned
//! fields rather than pinning a specific trip count.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use pantry_budget::config::Config;
use pantry_budget::schedule::TripSchedule;
use pantry_budget::server::{router, ServerState};
use pantry_budget::store::BudgetStore;

fn test_app(dir: &tempfile::TempDir) -> axum::Router {
    let store = BudgetStore::with_file(dir.path().join("data.json"), dec!(600));
    let state = ServerState {
        config: Arc::new(Config::default()),
        store: Arc::new(Mutex::new(store)),
        schedule: TripSchedule::default(),
    };
    router(state, dir.path())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_budget() -> Request<Body> {
    Request::builder()
        .uri("/api/budget")
        .body(Body::empty())
        .unwrap()
}

fn put_budget(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri("/api/budget")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_reset() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/reset")
        .body(Body::empty())
        .unwrap()
}

/// perTrip must equal the budget split across trips, truncated to cents
fn assert_allocation_consistent(json: &serde_json::Value) {
    let budget = json["remainingBudget"].as_f64().unwrap();
    let trips = json["remainingTrips"].as_u64().unwrap();
    let per_trip = json["perTrip"].as_f64().unwrap();

    let expected = if trips > 0 {
        (budget / trips as f64 * 100.0).floor() / 100.0
    } else {
        budget
    };
    assert!(
        (per_trip - expected).abs() < 1e-9,
        "perTrip {} does not match budget {} over {} trips",
        per_trip,
        budget,
        trips
    );
}

#[tokio::test]
async fn get_budget_returns_default_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app.oneshot(get_budget()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 600.0);
    assert!(json["remainingTrips"].as_u64().is_some());
    assert!(json["lastUpdated"].as_str().is_some());
    assert_allocation_consistent(&json);
}

#[tokio::test]
async fn update_is_visible_to_the_next_read() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(put_budget(r#"{"remainingBudget": 123.45}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 123.45);
    assert_allocation_consistent(&json);

    let response = app.oneshot(get_budget()).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 123.45);
}

#[tokio::test]
async fn negative_budget_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(put_budget(r#"{"remainingBudget": -5}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid budget value");

    // the record is untouched
    let response = app.oneshot(get_budget()).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 600.0);
}

#[tokio::test]
async fn zero_budget_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(put_budget(r#"{"remainingBudget": 0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 0.0);
    assert_eq!(json["perTrip"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn reset_restores_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .clone()
        .oneshot(put_budget(r#"{"remainingBudget": 42}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(post_reset()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 600.0);
    assert_allocation_consistent(&json);

    let response = app.oneshot(get_budget()).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["remainingBudget"].as_f64().unwrap(), 600.0);
}

#[tokio::test]
async fn status_reports_version() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn index_page_serves_the_ui() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Pantry Budget"));
    assert!(html.contains("/api/budget"));
}
