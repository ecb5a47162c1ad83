//! Gallery Models
//!
//! Images belong to a category; the category's stored files live under
//! `uploads/gallery/<category key>`. Category deletion cascades over
//! files, then image documents, then the category itself — orchestrated
//! by the repository, never by the store.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryCategory {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    /// Derived from name: lowercase, non-alphanumeric runs become hyphens
    pub slug: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryCategoryCreate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    /// Public URL of the stored file
    pub url: String,
    /// File name inside the category's storage folder
    pub file_name: String,
    /// Record link to the owning category; must reference a live category
    /// at write time
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryImageCreate {
    pub url: String,
    pub file_name: String,
    /// Category id, bare key or "gallery_category:key"
    pub category: String,
}
