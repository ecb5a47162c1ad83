//! Event Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::core::ServerState;
use crate::db::models::{Event, EventCreate, EventUpdate};
use crate::db::repository::EventRepository;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// `true` on the public site; the admin list omits it to see
    /// inactive events too
    #[serde(default)]
    pub active_only: bool,
}

/// GET /api/events - events in calendar order
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Event>>> {
    let repo = EventRepository::new(state.store.clone());
    let events = repo.find_all(params.active_only).await?;
    Ok(Json(events))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    let repo = EventRepository::new(state.store.clone());
    let event = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Event {id} not found")))?;
    Ok(Json(event))
}

/// POST /api/events - create (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    let repo = EventRepository::new(state.store.clone());
    let event = repo.create(payload).await?;
    tracing::info!(id = %event.id, title = %event.title, "Event created");
    Ok(Json(event))
}

/// PUT /api/events/{id} - partial update (admin)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<EventUpdate>,
) -> AppResult<Json<Event>> {
    let repo = EventRepository::new(state.store.clone());
    let event = repo.update(&id, payload).await?;
    Ok(Json(event))
}

/// DELETE /api/events/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = EventRepository::new(state.store.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
