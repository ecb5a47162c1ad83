//! Homepage Section Repository
//!
//! Sections are singletons keyed by a well-known name, so writes are
//! upserts: create-with-key on first save, merge afterwards.

use super::{RepoError, RepoResult};
use crate::db::models::{Section, SectionUpsert};
use crate::db::store::DocumentStore;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_repo_optional_text, validate_repo_text,
};

const COLLECTION: &str = "section";

#[derive(Clone)]
pub struct SectionRepository {
    store: DocumentStore,
}

impl SectionRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn find(&self, key: &str) -> RepoResult<Option<Section>> {
        validate_section_key(key)?;
        self.store.get_one(COLLECTION, key).await
    }

    pub async fn upsert(&self, key: &str, data: SectionUpsert) -> RepoResult<Section> {
        validate_section_key(key)?;
        validate_repo_text(&data.heading, "heading", MAX_NAME_LEN)?;
        validate_repo_optional_text(&data.subheading, "subheading", MAX_NAME_LEN)?;
        validate_repo_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_repo_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;

        let existing: Option<Section> = self.store.get_one(COLLECTION, key).await?;
        match existing {
            Some(_) => self.store.update(COLLECTION, key, &data).await,
            None => self.store.create(COLLECTION, Some(key), &data).await,
        }
    }
}

/// Section keys are short lowercase slugs (`hero`, `about`, ...)
fn validate_section_key(key: &str) -> RepoResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !valid {
        return Err(RepoError::Validation(format!("invalid section key: {key}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_section_key;

    #[test]
    fn accepts_known_section_keys() {
        for key in crate::db::models::KNOWN_SECTIONS {
            assert!(validate_section_key(key).is_ok());
        }
    }

    #[test]
    fn rejects_hostile_keys() {
        assert!(validate_section_key("").is_err());
        assert!(validate_section_key("Hero").is_err());
        assert!(validate_section_key("hero section").is_err());
        assert!(validate_section_key("hero;drop").is_err());
    }
}
