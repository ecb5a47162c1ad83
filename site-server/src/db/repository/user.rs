//! User Record Repository
//!
//! Keyed by the identity provider's uid, created on first sign-in.

use serde::Serialize;

use super::{RepoError, RepoResult};
use crate::db::models::{Role, UserRecord};
use crate::db::store::{DocumentStore, Ordering};
use crate::utils::validation::validate_email;

const COLLECTION: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    store: DocumentStore,
}

impl UserRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn find_by_uid(&self, uid: &str) -> RepoResult<Option<UserRecord>> {
        self.store.get_one(COLLECTION, uid).await
    }

    pub async fn find_all(&self) -> RepoResult<Vec<UserRecord>> {
        self.store
            .get_many(COLLECTION, &[], &[Ordering::asc("email")], None)
            .await
    }

    /// Fetch the record for a verified identity, creating it on first
    /// sign-in with the given default role.
    pub async fn ensure(
        &self,
        uid: &str,
        email: &str,
        default_role: Role,
    ) -> RepoResult<UserRecord> {
        if let Some(existing) = self.find_by_uid(uid).await? {
            return Ok(existing);
        }

        validate_email(email)?;

        #[derive(Serialize)]
        struct UserRow {
            email: String,
            role: Role,
        }

        let row = UserRow {
            email: email.to_string(),
            role: default_role,
        };

        match self.store.create(COLLECTION, Some(uid), &row).await {
            Ok(created) => Ok(created),
            // Two first sign-ins can race; whoever lost the create reads
            // the winner's record.
            Err(RepoError::Duplicate(_)) => self
                .find_by_uid(uid)
                .await?
                .ok_or_else(|| RepoError::Database(format!("user {uid} vanished after create race"))),
            Err(e) => Err(e),
        }
    }

    pub async fn set_role(&self, uid: &str, role: Role) -> RepoResult<UserRecord> {
        #[derive(Serialize)]
        struct RolePatch {
            role: Role,
        }
        self.store.update(COLLECTION, uid, &RolePatch { role }).await
    }
}
