//! Database Module
//!
//! Embedded SurrealDB storage. The store itself is schemaless; the only
//! definitions applied at startup are the unique indexes the application
//! relies on. Shape checks happen in the access layer, not the engine.

pub mod models;
pub mod repository;
pub mod store;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

pub use store::{Direction, DocumentStore, Filter, FilterValue, Ordering, Page};

/// Namespace / database selected on the embedded engine
const NAMESPACE: &str = "taproom";
const DATABASE: &str = "site";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database under `db_dir` and apply
    /// startup definitions.
    pub async fn new(db_dir: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_indexes(&db).await?;

        tracing::info!(path = %db_dir.display(), "Database opened (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}

/// Startup index definitions.
///
/// `user.email` and `gallery_category.name` are unique; everything else is
/// looked up by record id or scanned.
async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
    let statements = [
        "DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE",
        "DEFINE INDEX IF NOT EXISTS gallery_category_name ON gallery_category FIELDS name UNIQUE",
        "DEFINE INDEX IF NOT EXISTS booking_created_at ON booking FIELDS created_at",
    ];

    for statement in statements {
        db.query(statement)
            .await
            .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define index: {e}")))?;
    }

    Ok(())
}
