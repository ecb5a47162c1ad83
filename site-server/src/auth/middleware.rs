//! Session middleware
//!
//! One gate in front of the whole API, layered in `build_app`. Public
//! routes (the marketing pages' reads, the booking form, the session
//! endpoints) pass straight through; `/api/auth/me` needs a valid
//! session; everything else under `/api/` is admin-only.
//!
//! The admin check looks the user's stored role up fresh from the `user`
//! collection on every entry — role is never trusted from the session
//! token, so a demoted admin is locked out on their next request, not at
//! cookie expiry. Any failure answers 401 with the session cookie
//! cleared; the client owns the redirect to its login screen.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::Method;
use http::header::SET_COOKIE;

use crate::AppError;
use crate::auth::session::{SessionError, clear_cookie, session_token};
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::UserRepository;
use crate::security_log;

/// Authenticated user context injected into request extensions
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
}

/// Routes reachable without a session.
///
/// Marketing reads are open; so are the booking form and the session
/// endpoints themselves. Everything else under `/api/` is gated.
fn is_public_route(method: &Method, path: &str) -> bool {
    // CORS preflight
    if method == Method::OPTIONS {
        return true;
    }
    // Non-API paths (media files, 404s) are not this gate's business
    if !path.starts_with("/api/") {
        return true;
    }

    match *method {
        Method::GET => {
            path == "/api/health"
                || path == "/api/menu-items"
                || path.starts_with("/api/menu-items/")
                || path == "/api/events"
                || path.starts_with("/api/events/")
                || path.starts_with("/api/gallery/")
                || path.starts_with("/api/sections/")
        }
        Method::POST => {
            path == "/api/bookings" || path == "/api/auth/session" || path == "/api/auth/logout"
        }
        Method::DELETE => path == "/api/auth/session",
        _ => false,
    }
}

/// 401 with the session cookie cleared
fn signed_out(error: AppError) -> Response {
    let mut response = error.into_response();
    response.headers_mut().insert(SET_COOKIE, clear_cookie());
    response
}

/// Validate the session cookie on a request
fn validate_session(state: &ServerState, req: &Request) -> Result<SessionUser, Response> {
    let token = match session_token(req.headers()) {
        Some(token) => token,
        None => {
            security_log!("WARN", "session_missing", uri = format!("{:?}", req.uri()));
            return Err(signed_out(AppError::unauthorized()));
        }
    };

    match state.sessions.validate(&token) {
        Ok(claims) => Ok(SessionUser {
            uid: claims.sub,
            email: claims.email,
        }),
        Err(e) => {
            security_log!(
                "WARN",
                "session_invalid",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            match e {
                SessionError::ExpiredToken => Err(signed_out(AppError::session_expired())),
                _ => Err(signed_out(AppError::invalid_session())),
            }
        }
    }
}

/// Auth gate middleware protecting the admin API
pub async fn auth_gate(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if is_public_route(req.method(), &path) {
        return next.run(req).await;
    }

    let user = match validate_session(&state, &req) {
        Ok(user) => user,
        Err(response) => return response,
    };

    // A session is enough to ask who you are
    if path == "/api/auth/me" {
        req.extensions_mut().insert(user);
        return next.run(req).await;
    }

    // Everything else needs the stored admin role, checked per request
    let repo = UserRepository::new(state.store.clone());
    let record = match repo.find_by_uid(&user.uid).await {
        Ok(record) => record,
        Err(e) => return AppError::from(e).into_response(),
    };

    match record {
        Some(record) if record.role == Role::Admin => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        _ => {
            security_log!(
                "WARN",
                "admin_required",
                uid = user.uid.clone(),
                email = user.email.clone(),
                uri = format!("{:?}", req.uri())
            );
            signed_out(AppError::unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_public_route;
    use http::Method;

    #[test]
    fn public_reads_are_open() {
        assert!(is_public_route(&Method::GET, "/api/menu-items"));
        assert!(is_public_route(&Method::GET, "/api/events/abc"));
        assert!(is_public_route(&Method::GET, "/api/gallery/images"));
        assert!(is_public_route(&Method::GET, "/api/sections/hero"));
        assert!(is_public_route(&Method::POST, "/api/bookings"));
        assert!(is_public_route(&Method::POST, "/api/auth/session"));
        assert!(is_public_route(&Method::GET, "/media/menu/x.jpg"));
    }

    #[test]
    fn admin_surface_is_gated() {
        assert!(!is_public_route(&Method::POST, "/api/menu-items"));
        assert!(!is_public_route(&Method::PUT, "/api/menu-items/abc"));
        assert!(!is_public_route(&Method::GET, "/api/bookings"));
        assert!(!is_public_route(&Method::PUT, "/api/bookings/abc/status"));
        assert!(!is_public_route(&Method::GET, "/api/users"));
        assert!(!is_public_route(&Method::POST, "/api/upload"));
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::DELETE, "/api/gallery/categories/x"));
    }
}
