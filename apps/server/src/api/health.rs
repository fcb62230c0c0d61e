//! Health check handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
}

/// GET /api/health - liveness plus a database ping. Unauthenticated.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.db.health_check().await;
    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
