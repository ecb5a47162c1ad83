//! Auth Routes
//!
//! Session establishment from an identity token, session teardown, and
//! the current-user lookup. `/api/auth/logout` is kept alongside
//! `DELETE /api/auth/session` — both clear the cookie; older clients
//! call the former.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/auth/session",
            post(handler::create_session).delete(handler::delete_session),
        )
        .route("/api/auth/logout", post(handler::delete_session))
        .route("/api/auth/me", get(handler::me))
}
