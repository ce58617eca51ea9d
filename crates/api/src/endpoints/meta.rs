//! Health and metadata endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

/// Health probe response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub database: &'static str,
    pub redis: &'static str,
}

/// Liveness probe, reporting backend reachability.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.db.ping().await.is_ok() {
        "healthy"
    } else {
        "unhealthy"
    };
    let redis = match &state.revocation_cache {
        Some(cache) if cache.is_connected() => "healthy",
        Some(_) => "unhealthy",
        None => "disabled",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        redis,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}
