use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{HttpIdentityProvider, IdentityProvider, SessionService};
use crate::core::Config;
use crate::db::{DbService, DocumentStore};
use crate::storage::MediaStorage;

/// Server state — shared handles to every service.
///
/// Cheap to clone (everything inside is an `Arc` or an engine handle that
/// is itself reference-counted); a clone is handed to each request.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | store | generic document access layer |
/// | media | uploaded file storage |
/// | sessions | session JWT service |
/// | identity | identity provider client (trait object; tests inject a static one) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub store: DocumentStore,
    pub media: MediaStorage,
    pub sessions: Arc<SessionService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl ServerState {
    /// Initialize against the production identity provider.
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized —
    /// there is nothing to serve without them.
    pub async fn initialize(config: &Config) -> Self {
        let identity = Arc::new(HttpIdentityProvider::new(
            config.identity_base_url.clone(),
            config.identity_api_key.clone(),
        ));
        Self::initialize_with(config, identity).await
    }

    /// Initialize with an injected identity provider (tests)
    pub async fn initialize_with(config: &Config, identity: Arc<dyn IdentityProvider>) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        let store = DocumentStore::new(db.clone());
        let media = MediaStorage::new(config.uploads_dir(), config.public_base_url.clone());
        let sessions = Arc::new(SessionService::with_config(config.session.clone()));

        Self {
            config: config.clone(),
            db,
            store,
            media,
            sessions,
            identity,
        }
    }
}
