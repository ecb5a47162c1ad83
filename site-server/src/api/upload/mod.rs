//! Upload Routes

mod handler;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};

use crate::core::ServerState;

/// Request body headroom over the 5MB image cap (multipart framing)
const BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}
