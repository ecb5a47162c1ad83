//! Gallery Handlers
//!
//! Category deletion is the one cascading delete in the system and it is
//! orchestrated here, in order: stored files first, then image
//! documents, then the category itself. Deletions within each step run
//! concurrently; the sequence is not atomic — a failure partway can
//! leave files gone with documents intact, which the admin resolves by
//! retrying.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use futures::future::join_all;
use serde::Deserialize;
use surrealdb::RecordId;

use crate::AppError;
use crate::core::ServerState;
use crate::db::models::{
    GalleryCategory, GalleryCategoryCreate, GalleryImage, GalleryImageCreate,
};
use crate::db::repository::GalleryRepository;
use crate::utils::AppResult;

const CATEGORY_COLLECTION: &str = "gallery_category";

/// GET /api/gallery/categories
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<GalleryCategory>>> {
    let repo = GalleryRepository::new(state.store.clone());
    let categories = repo.categories().await?;
    Ok(Json(categories))
}

/// POST /api/gallery/categories - create (admin)
pub async fn create_category(
    State(state): State<ServerState>,
    Json(payload): Json<GalleryCategoryCreate>,
) -> AppResult<Json<GalleryCategory>> {
    let repo = GalleryRepository::new(state.store.clone());
    let category = repo.create_category(payload).await?;
    tracing::info!(id = %category.id, name = %category.name, "Gallery category created");
    Ok(Json(category))
}

/// DELETE /api/gallery/categories/{id} - cascade delete (admin)
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = GalleryRepository::new(state.store.clone());

    let category = repo
        .category_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Gallery category {id} not found")))?;
    let category_key = category.id.key().to_string();

    // 1. Stored files, deleted concurrently
    let folder = format!("gallery/{category_key}");
    let files = state.media.list(&folder).await?;
    let file_count = files.len();
    let deletions = files
        .iter()
        .map(|file| state.media.delete(&file.path));
    for result in join_all(deletions).await {
        result?;
    }

    // 2. Image documents, deleted concurrently
    let images = repo.images(Some(&category.id)).await?;
    let image_count = images.len();
    let deletions = images.iter().map(|image| {
        let repo = repo.clone();
        let key = image.id.key().to_string();
        async move { repo.delete_image(&key).await }
    });
    for result in join_all(deletions).await {
        result?;
    }

    // 3. The category itself
    repo.delete_category(&category_key).await?;

    tracing::info!(
        id = %category.id,
        files = file_count,
        images = image_count,
        "Gallery category deleted"
    );

    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct ImageListParams {
    /// Category key; omitted = all images
    pub category: Option<String>,
}

/// GET /api/gallery/images - images, newest first
pub async fn list_images(
    State(state): State<ServerState>,
    Query(params): Query<ImageListParams>,
) -> AppResult<Json<Vec<GalleryImage>>> {
    let repo = GalleryRepository::new(state.store.clone());
    let category = params
        .category
        .as_deref()
        .map(|key| RecordId::from_table_key(CATEGORY_COLLECTION, strip_prefix(key)));
    let images = repo.images(category.as_ref()).await?;
    Ok(Json(images))
}

/// POST /api/gallery/images - register an uploaded image (admin)
pub async fn create_image(
    State(state): State<ServerState>,
    Json(payload): Json<GalleryImageCreate>,
) -> AppResult<Json<GalleryImage>> {
    let repo = GalleryRepository::new(state.store.clone());
    let image = repo.create_image(payload).await?;
    Ok(Json(image))
}

/// DELETE /api/gallery/images/{id} - delete document and stored file
/// (admin)
pub async fn delete_image(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = GalleryRepository::new(state.store.clone());

    let image = repo
        .image_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Gallery image {id} not found")))?;

    let path = format!(
        "gallery/{}/{}",
        image.category.key(),
        image.file_name
    );
    state.media.delete(&path).await?;
    repo.delete_image(&id).await?;

    Ok(Json(true))
}

/// Accept both bare keys and "gallery_category:key" ids from the query
/// string
fn strip_prefix(key: &str) -> &str {
    key.strip_prefix("gallery_category:").unwrap_or(key)
}
