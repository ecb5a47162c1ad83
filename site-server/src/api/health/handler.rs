//! Health Check Handler

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /api/health - liveness + database ping
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    let database = match state.db.query("RETURN 1").await {
        Ok(_) => "up",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            "down"
        }
    };

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    }))
}
