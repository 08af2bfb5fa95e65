//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Liveness plus a database ping; degraded connectivity is reported in
/// the body rather than as an error status.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.repo.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            "down"
        }
    };

    Json(HealthResponse {
        status: "ok",
        version: paperscope_common::VERSION,
        database,
    })
}
