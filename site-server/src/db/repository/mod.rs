//! Repository Module
//!
//! Per-entity business rules layered on the generic [`DocumentStore`]:
//! shape validation before the write, duplicate checks, referential
//! integrity across entities. One authoritative module per entity.

pub mod booking;
pub mod event;
pub mod gallery;
pub mod menu_item;
pub mod section;
pub mod user;

pub use booking::BookingRepository;
pub use event::EventRepository;
pub use gallery::GalleryRepository;
pub use menu_item::MenuItemRepository;
pub use section::SectionRepository;
pub use user::UserRepository;

use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // The engine reports key collisions as plain errors; keep them
        // distinguishable for callers.
        if message.contains("already exists") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Validate a calendar date form field (YYYY-MM-DD)
pub(crate) fn validate_date(date: &str) -> RepoResult<()> {
    crate::utils::time::parse_date(date)
        .map(|_| ())
        .map_err(|_| RepoError::Validation(format!("Invalid date format: {date}")))
}

/// Validate a 24h clock form field (HH:MM)
pub(crate) fn validate_time(time: &str) -> RepoResult<()> {
    crate::utils::time::parse_time(time)
        .map(|_| ())
        .map_err(|_| RepoError::Validation(format!("Invalid time format: {time}")))
}
