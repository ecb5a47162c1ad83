//! Auth Handlers
//!
//! The browser holds a short-lived identity token from the hosted
//! provider; `create_session` trades it for this server's own httpOnly
//! session cookie. The user record is created on first sign-in.

use axum::{Extension, Json, extract::State, response::Response};
use axum::response::IntoResponse;
use http::header::SET_COOKIE;
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::auth::identity::IdentityError;
use crate::auth::session::clear_cookie;
use crate::auth::SessionUser;
use crate::core::ServerState;
use crate::db::models::{Role, UserRecord};
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    /// Identity token from the provider; `idToken` accepted for
    /// compatibility with the original client
    #[serde(alias = "idToken")]
    pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserRecord,
}

/// POST /api/auth/session - verify the identity token and set the
/// session cookie
pub async fn create_session(
    State(state): State<ServerState>,
    Json(req): Json<SessionRequest>,
) -> AppResult<Response> {
    let id_token = req
        .id_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid("idToken is required"))?;

    let claims = state
        .identity
        .verify_id_token(id_token)
        .await
        .map_err(|e| match e {
            IdentityError::InvalidToken => {
                tracing::warn!(target: "security", "Session request with invalid identity token");
                AppError::invalid_session()
            }
            IdentityError::Provider(msg) => AppError::identity_provider(msg),
        })?;

    // First sign-in creates the record. Default role is `user`; the
    // configured bootstrap email is the only path to a first admin.
    let default_role = match &state.config.bootstrap_admin_email {
        Some(admin_email) if admin_email.eq_ignore_ascii_case(&claims.email) => Role::Admin,
        _ => Role::User,
    };

    let repo = UserRepository::new(state.store.clone());
    let user = repo.ensure(&claims.uid, &claims.email, default_role).await?;

    let token = state
        .sessions
        .mint(&claims.uid, &claims.email)
        .map_err(|e| AppError::internal(format!("Failed to mint session: {e}")))?;

    tracing::info!(uid = %claims.uid, "Session established");

    let mut response = Json(SessionResponse { user }).into_response();
    response
        .headers_mut()
        .insert(SET_COOKIE, state.sessions.cookie(&token));
    Ok(response)
}

/// DELETE /api/auth/session (and POST /api/auth/logout) - clear the
/// session cookie
pub async fn delete_session() -> Response {
    let mut response = Json(serde_json::json!({ "signed_out": true })).into_response();
    response.headers_mut().insert(SET_COOKIE, clear_cookie());
    response
}

/// GET /api/auth/me - the signed-in user's record
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<SessionUser>,
) -> AppResult<Json<UserRecord>> {
    let repo = UserRepository::new(state.store.clone());
    let record = repo
        .find_by_uid(&user.uid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.uid)))?;
    Ok(Json(record))
}
