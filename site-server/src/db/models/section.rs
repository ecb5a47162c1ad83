//! Homepage Section Model
//!
//! Sections are singleton documents keyed by a well-known name (`hero`,
//! `about`, `interior`, ...) rather than a generated id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

use super::serde_helpers;

/// Section keys the admin UI knows how to edit
pub const KNOWN_SECTIONS: &[&str] = &["hero", "about", "interior", "hours", "contact"];

/// Editable marketing copy for one page region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Section-specific fields (stats, opening hours, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extras: Map<String, Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload; full replacement of the section's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionUpsert {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extras: Map<String, Value>,
}
