//! User Handlers
//!
//! Admin-only. Role changes take effect on the target's next request —
//! the auth gate reads the stored role every time.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::auth::SessionUser;
use crate::core::ServerState;
use crate::db::models::{Role, RoleUpdate, UserRecord};
use crate::db::repository::UserRepository;
use crate::utils::AppResult;

/// GET /api/users (admin)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserRecord>>> {
    let repo = UserRepository::new(state.store.clone());
    let users = repo.find_all().await?;
    Ok(Json(users))
}

/// PUT /api/users/{uid}/role (admin)
pub async fn set_role(
    State(state): State<ServerState>,
    Extension(current): Extension<SessionUser>,
    Path(uid): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<UserRecord>> {
    // Demoting yourself would lock the last admin out mid-session
    if current.uid == uid && payload.role != Role::Admin {
        return Err(AppError::validation("You cannot remove your own admin role"));
    }

    let repo = UserRepository::new(state.store.clone());
    let user = repo.set_role(&uid, payload.role).await?;
    tracing::info!(target: "security", uid = %uid, role = ?user.role, "User role changed");
    Ok(Json(user))
}
