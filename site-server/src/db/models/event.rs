//! Event Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers::{self, default_true};

/// A scheduled event (quiz night, live music, tasting, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub title: String,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
    /// 24h clock, HH:MM
    pub time: String,
    pub description: String,
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub price: Decimal,
    pub capacity: u32,
    pub location: String,
    pub duration_minutes: u32,
    /// Gates public visibility
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub short_description: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub capacity: u32,
    pub location: String,
    pub duration_minutes: u32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
