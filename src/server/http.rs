//! HTTP API handlers

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::allocation;
use crate::server::ServerState;
use crate::store::{BudgetError, BudgetState};

/// Budget payload returned by every budget route
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    pub remaining_trips: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub per_trip: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl BudgetResponse {
    /// Derive trips and per-trip figures from the record and the wall clock.
    ///
    /// Recomputed on every request; derived values are never stored.
    fn derive(state: &ServerState, record: BudgetState) -> Self {
        let remaining_trips = state.schedule.remaining_trips(Local::now());
        let per_trip = allocation::per_trip(record.remaining_budget, remaining_trips);

        Self {
            remaining_budget: record.remaining_budget,
            remaining_trips,
            per_trip,
            last_updated: record.last_updated,
        }
    }
}

/// Update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
}

/// Current budget handler
pub async fn budget_handler(State(state): State<ServerState>) -> impl IntoResponse {
    let record = {
        let store = state.store.lock().await;
        store.load()
    };

    (StatusCode::OK, Json(BudgetResponse::derive(&state, record))).into_response()
}

/// Update handler; rejects negative amounts before anything is persisted
pub async fn update_budget_handler(
    State(state): State<ServerState>,
    Json(req): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let result = {
        let store = state.store.lock().await;
        store.update_amount(req.remaining_budget)
    };

    let record = match result {
        Ok(record) => record,
        Err(e) if e.downcast_ref::<BudgetError>().is_some() => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid budget value",
                    "details": e.to_string()
                })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to save budget",
                    "details": e.to_string()
                })),
            )
                .into_response();
        }
    };

    tracing::info!(amount = %record.remaining_budget, "Budget updated");

    (StatusCode::OK, Json(BudgetResponse::derive(&state, record))).into_response()
}

/// Reset handler; restores the configured default amount
pub async fn reset_handler(State(state): State<ServerState>) -> impl IntoResponse {
    let result = {
        let store = state.store.lock().await;
        store.reset()
    };

    let record = match result {
        Ok(record) => record,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to reset budget",
                    "details": e.to_string()
                })),
            )
                .into_response();
        }
    };

    tracing::info!(amount = %record.remaining_budget, "Budget reset to default");

    (StatusCode::OK, Json(BudgetResponse::derive(&state, record))).into_response()
}

/// Status handler
pub async fn status_handler() -> impl IntoResponse {
    let response = StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
