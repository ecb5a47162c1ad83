//! Event Repository

use serde::Serialize;

use super::{RepoError, RepoResult, validate_date, validate_time};
use crate::db::models::{Event, EventCreate, EventUpdate};
use crate::db::store::{DocumentStore, Filter, Ordering};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_repo_optional_text,
    validate_repo_text,
};

const COLLECTION: &str = "event";

#[derive(Clone)]
pub struct EventRepository {
    store: DocumentStore,
}

impl EventRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Events in calendar order. The public site passes
    /// `active_only = true`; the admin list sees everything.
    pub async fn find_all(&self, active_only: bool) -> RepoResult<Vec<Event>> {
        let mut filters = Vec::new();
        if active_only {
            filters.push(Filter::eq("is_active", true));
        }
        let ordering = [Ordering::asc("date"), Ordering::asc("time")];
        self.store.get_many(COLLECTION, &filters, &ordering, None).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Event>> {
        self.store.get_one(COLLECTION, id).await
    }

    pub async fn create(&self, data: EventCreate) -> RepoResult<Event> {
        validate_repo_text(&data.title, "title", MAX_NAME_LEN)?;
        validate_repo_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_repo_text(&data.short_description, "short_description", MAX_SHORT_TEXT_LEN)?;
        validate_repo_text(&data.location, "location", MAX_SHORT_TEXT_LEN)?;
        validate_repo_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        validate_date(&data.date)?;
        validate_time(&data.time)?;
        if data.price.is_sign_negative() {
            return Err(RepoError::Validation("price must not be negative".into()));
        }
        if data.capacity == 0 {
            return Err(RepoError::Validation("capacity must be positive".into()));
        }
        if data.duration_minutes == 0 {
            return Err(RepoError::Validation("duration must be positive".into()));
        }

        #[derive(Serialize)]
        struct EventRow {
            title: String,
            date: String,
            time: String,
            description: String,
            short_description: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            image_url: Option<String>,
            price: rust_decimal::Decimal,
            capacity: u32,
            location: String,
            duration_minutes: u32,
            is_active: bool,
        }

        let row = EventRow {
            title: data.title,
            date: data.date,
            time: data.time,
            description: data.description,
            short_description: data.short_description,
            image_url: data.image_url,
            price: data.price,
            capacity: data.capacity,
            location: data.location,
            duration_minutes: data.duration_minutes,
            is_active: data.is_active.unwrap_or(true),
        };

        self.store.create(COLLECTION, None, &row).await
    }

    pub async fn update(&self, id: &str, data: EventUpdate) -> RepoResult<Event> {
        if let Some(ref title) = data.title {
            validate_repo_text(title, "title", MAX_NAME_LEN)?;
        }
        if let Some(ref description) = data.description {
            validate_repo_text(description, "description", MAX_NOTE_LEN)?;
        }
        if let Some(ref short_description) = data.short_description {
            validate_repo_text(short_description, "short_description", MAX_SHORT_TEXT_LEN)?;
        }
        if let Some(ref location) = data.location {
            validate_repo_text(location, "location", MAX_SHORT_TEXT_LEN)?;
        }
        validate_repo_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        if let Some(ref date) = data.date {
            validate_date(date)?;
        }
        if let Some(ref time) = data.time {
            validate_time(time)?;
        }
        if let Some(price) = data.price
            && price.is_sign_negative()
        {
            return Err(RepoError::Validation("price must not be negative".into()));
        }
        if data.capacity == Some(0) {
            return Err(RepoError::Validation("capacity must be positive".into()));
        }
        if data.duration_minutes == Some(0) {
            return Err(RepoError::Validation("duration must be positive".into()));
        }

        self.store.update(COLLECTION, id, &data).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.store.delete(COLLECTION, id).await
    }
}
