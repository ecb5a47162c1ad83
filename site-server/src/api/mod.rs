//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`auth`] - session establishment and teardown
//! - [`menu_items`] - menu management
//! - [`events`] - event management
//! - [`gallery`] - gallery categories and images
//! - [`bookings`] - public booking form and admin booking list
//! - [`sections`] - homepage section copy
//! - [`users`] - user role management
//! - [`upload`] - image upload
//! - [`media`] - stored file serving
//!
//! Admin protection is one gate ([`crate::auth::auth_gate`]) layered over
//! the whole router; public routes are skipped by its allow-list.

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod auth;
pub mod bookings;
pub mod events;
pub mod gallery;
pub mod health;
pub mod media;
pub mod menu_items;
pub mod sections;
pub mod upload;
pub mod users;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu_items::router())
        .merge(events::router())
        .merge(gallery::router())
        .merge(bookings::router())
        .merge(sections::router())
        .merge(users::router())
        .merge(upload::router())
        .merge(media::router())
}

/// Build the fully configured application with middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - the public site and admin UI are served elsewhere
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
        // Request ID - unique id per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // ========== Application Middleware ==========
        // Auth gate - validates session + admin role ahead of admin routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::auth_gate,
        ))
}
