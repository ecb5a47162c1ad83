//! Booking Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Booking workflow status.
///
/// No transition graph is enforced: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Declined,
}

/// A table booking submitted from the public site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Calendar date, YYYY-MM-DD
    pub date: String,
    /// 24h clock, HH:MM
    pub time: String,
    pub party_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    /// Optional link to the event being booked
    #[serde(default, with = "serde_helpers::option_record_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<RecordId>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public booking form payload. Status is not accepted here; every new
/// booking starts out pending.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub notes: Option<String>,
    /// Event id, bare key or "event:key"
    pub event: Option<String>,
}

/// Admin status transition payload
#[derive(Debug, Clone, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
