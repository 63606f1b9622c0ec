use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_up = yamdb_db::health_check(&state.pool).await.is_ok();
    if !db_up {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if db_up { "up" } else { "down" },
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
