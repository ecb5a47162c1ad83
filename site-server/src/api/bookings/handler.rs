//! Booking Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatus, BookingStatusUpdate};
use crate::db::repository::BookingRepository;
use crate::utils::AppResult;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// POST /api/bookings - public booking form
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.store.clone());
    let booking = repo.create(payload).await?;
    tracing::info!(
        id = %booking.id,
        date = %booking.date,
        party_size = booking.party_size,
        "Booking received"
    );
    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<BookingStatus>,
    /// `next_cursor` from the previous page
    pub cursor: Option<i64>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BookingPage {
    pub items: Vec<Booking>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
    pub has_more: bool,
}

/// GET /api/bookings - admin list, newest first, cursor-paginated
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<BookingPage>> {
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let repo = BookingRepository::new(state.store.clone());
    let page = repo
        .page(
            params.status,
            page_size,
            params.cursor.map(serde_json::Value::from),
        )
        .await?;

    Ok(Json(BookingPage {
        items: page.items,
        next_cursor: page.next_cursor.as_ref().and_then(|v| v.as_i64()),
        has_more: page.has_more,
    }))
}

/// GET /api/bookings/{id} (admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.store.clone());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))?;
    Ok(Json(booking))
}

/// PUT /api/bookings/{id}/status - the only admin-mutable field (admin)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.store.clone());
    let booking = repo.set_status(&id, payload.status).await?;
    tracing::info!(id = %booking.id, status = ?booking.status, "Booking status changed");
    Ok(Json(booking))
}

/// DELETE /api/bookings/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = BookingRepository::new(state.store.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
