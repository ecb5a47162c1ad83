//! Booking Repository

use serde::Serialize;
use serde_json::Value;
use surrealdb::RecordId;

use super::{RepoError, RepoResult, validate_date, validate_time};
use crate::db::models::{Booking, BookingCreate, BookingStatus, Event};
use crate::db::store::{Direction, DocumentStore, Filter, Page};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PARTY_SIZE, MAX_SHORT_TEXT_LEN, MIN_PARTY_SIZE,
    validate_email, validate_repo_optional_text, validate_repo_text,
};

const COLLECTION: &str = "booking";
const EVENT_COLLECTION: &str = "event";

#[derive(Clone)]
pub struct BookingRepository {
    store: DocumentStore,
}

impl BookingRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Create a booking from the public form. Status is forced to
    /// pending; a linked event must exist at write time.
    pub async fn create(&self, data: BookingCreate) -> RepoResult<Booking> {
        validate_repo_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_email(&data.email)?;
        validate_repo_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_date(&data.date)?;
        validate_time(&data.time)?;
        validate_repo_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&data.party_size) {
            return Err(RepoError::Validation(format!(
                "party_size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}"
            )));
        }

        // Referential integrity is on the writer, not the store
        let event = match data.event.as_deref() {
            Some(key) => {
                let event: Option<Event> = self.store.get_one(EVENT_COLLECTION, key).await?;
                let event =
                    event.ok_or_else(|| RepoError::Validation(format!("unknown event: {key}")))?;
                Some(event.id)
            }
            None => None,
        };

        #[derive(Serialize)]
        struct BookingRow {
            name: String,
            email: String,
            phone: String,
            date: String,
            time: String,
            party_size: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            notes: Option<String>,
            status: BookingStatus,
            /// Persisted in string form, like every record reference
            #[serde(
                with = "crate::db::models::serde_helpers::option_record_id",
                skip_serializing_if = "Option::is_none"
            )]
            event: Option<RecordId>,
        }

        let row = BookingRow {
            name: data.name,
            email: data.email,
            phone: data.phone,
            date: data.date,
            time: data.time,
            party_size: data.party_size,
            notes: data.notes,
            status: BookingStatus::Pending,
            event,
        };

        self.store.create(COLLECTION, None, &row).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        self.store.get_one(COLLECTION, id).await
    }

    /// One admin-list page, newest first, optionally restricted to a
    /// status.
    pub async fn page(
        &self,
        status: Option<BookingStatus>,
        page_size: usize,
        cursor: Option<Value>,
    ) -> RepoResult<Page<Booking>> {
        let mut filters = Vec::new();
        if let Some(status) = status {
            filters.push(Filter::eq(
                "status",
                serde_json::to_value(status).unwrap_or_default(),
            ));
        }
        self.store
            .get_page(
                COLLECTION,
                &filters,
                "created_at",
                Direction::Desc,
                page_size,
                cursor,
            )
            .await
    }

    /// Status is the only admin-mutable field after creation
    pub async fn set_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        #[derive(Serialize)]
        struct StatusPatch {
            status: BookingStatus,
        }
        self.store.update(COLLECTION, id, &StatusPatch { status }).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(COLLECTION, id).await
    }
}
