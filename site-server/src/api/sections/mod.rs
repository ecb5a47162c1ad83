//! Homepage Section Routes

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/sections/{key}",
        get(handler::get_by_key).put(handler::upsert),
    )
}
