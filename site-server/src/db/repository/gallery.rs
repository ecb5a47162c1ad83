//! Gallery Repository
//!
//! Categories and images. Deletion of a category cascades over stored
//! files, image documents, then the category itself; the ordered
//! sequence is orchestrated by the gallery handler, which owns both this
//! repository and the media storage — the document operations here never
//! cascade on their own.

use serde::Serialize;
use surrealdb::RecordId;

use super::{RepoError, RepoResult};
use crate::db::models::{GalleryCategory, GalleryCategoryCreate, GalleryImage, GalleryImageCreate};
use crate::db::store::{DocumentStore, Filter, Ordering};
use crate::utils::slug::slugify;
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_repo_text};

const CATEGORY_COLLECTION: &str = "gallery_category";
const IMAGE_COLLECTION: &str = "gallery_image";

#[derive(Clone)]
pub struct GalleryRepository {
    store: DocumentStore,
}

impl GalleryRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    // ── Categories ──────────────────────────────────────────────────

    pub async fn categories(&self) -> RepoResult<Vec<GalleryCategory>> {
        self.store
            .get_many(CATEGORY_COLLECTION, &[], &[Ordering::asc("name")], None)
            .await
    }

    pub async fn category_by_id(&self, id: &str) -> RepoResult<Option<GalleryCategory>> {
        self.store.get_one(CATEGORY_COLLECTION, id).await
    }

    pub async fn category_by_name(&self, name: &str) -> RepoResult<Option<GalleryCategory>> {
        let matches: Vec<GalleryCategory> = self
            .store
            .get_many(
                CATEGORY_COLLECTION,
                &[Filter::eq("name", name)],
                &[],
                Some(1),
            )
            .await?;
        Ok(matches.into_iter().next())
    }

    pub async fn create_category(&self, data: GalleryCategoryCreate) -> RepoResult<GalleryCategory> {
        validate_repo_text(&data.name, "name", MAX_NAME_LEN)?;

        if self.category_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Gallery category '{}' already exists",
                data.name
            )));
        }

        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(format!(
                "name '{}' produces an empty slug",
                data.name
            )));
        }

        #[derive(Serialize)]
        struct CategoryRow {
            name: String,
            slug: String,
        }

        self.store
            .create(
                CATEGORY_COLLECTION,
                None,
                &CategoryRow {
                    name: data.name,
                    slug,
                },
            )
            .await
    }

    /// Delete the category document only; see the module doc for the
    /// cascade ordering.
    pub async fn delete_category(&self, id: &str) -> RepoResult<()> {
        self.store.delete(CATEGORY_COLLECTION, id).await
    }

    // ── Images ──────────────────────────────────────────────────────

    /// Images, newest first, optionally for one category
    pub async fn images(&self, category: Option<&RecordId>) -> RepoResult<Vec<GalleryImage>> {
        let mut filters = Vec::new();
        if let Some(category) = category {
            filters.push(Filter::eq("category", category.clone()));
        }
        self.store
            .get_many(
                IMAGE_COLLECTION,
                &filters,
                &[Ordering::desc("created_at")],
                None,
            )
            .await
    }

    pub async fn image_by_id(&self, id: &str) -> RepoResult<Option<GalleryImage>> {
        self.store.get_one(IMAGE_COLLECTION, id).await
    }

    /// Create an image document. The referenced category must be alive at
    /// write time.
    pub async fn create_image(&self, data: GalleryImageCreate) -> RepoResult<GalleryImage> {
        validate_repo_text(&data.url, "url", MAX_URL_LEN)?;
        validate_repo_text(&data.file_name, "file_name", MAX_NAME_LEN)?;

        let category = self
            .category_by_id(&data.category)
            .await?
            .ok_or_else(|| {
                RepoError::Validation(format!("unknown gallery category: {}", data.category))
            })?;

        #[derive(Serialize)]
        struct ImageRow {
            url: String,
            file_name: String,
            /// Persisted in string form, like every record reference
            #[serde(with = "crate::db::models::serde_helpers::record_id")]
            category: RecordId,
        }

        self.store
            .create(
                IMAGE_COLLECTION,
                None,
                &ImageRow {
                    url: data.url,
                    file_name: data.file_name,
                    category: category.id,
                },
            )
            .await
    }

    pub async fn delete_image(&self, id: &str) -> RepoResult<()> {
        self.store.delete(IMAGE_COLLECTION, id).await
    }
}
