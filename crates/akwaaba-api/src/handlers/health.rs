//! Liveness endpoint.

use axum::{extract::State, Json};

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /api/health
///
/// Reports `degraded` when the data directory has gone missing.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage_ok = state.services.config.data_dir.is_dir();
    Json(HealthResponse {
        status: if storage_ok { "ok" } else { "degraded" }.to_string(),
        storage: if storage_ok { "ok" } else { "unavailable" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.config.uptime_seconds(),
    })
}
