//! Query service: read-only HTTP access to the latest fuel status.

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use fuelbridge_core::FuelStatus;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "fuel-bridge";

/// Build the query router.
///
/// Cross-origin access is open to every origin, method and header so the
/// mobile client can call it from anywhere.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fuel_update", get(get_fuel_status))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(cors_layer()).into_inner())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn get_fuel_status(State(state): State<Arc<AppState>>) -> Json<FuelStatus> {
    Json(state.store.read())
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.store.stats();
    let now = Utc::now();

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": now.to_rfc3339(),
        "uptime_secs": (now - state.started_at).num_seconds(),
        "updates_applied": stats.updates_applied,
        "parse_errors": stats.parse_errors,
        "last_updated": stats.last_updated.map(|t| t.to_rfc3339()),
    }))
}
