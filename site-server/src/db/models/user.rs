//! User Record Model
//!
//! One record per identity-provider account, keyed by the provider uid
//! and created on first sign-in. The role stored here is the single
//! source of truth for admin access; it is looked up fresh on every
//! admin-route entry, never trusted from the session token.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub email: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Admin role-change payload
#[derive(Debug, Clone, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}
