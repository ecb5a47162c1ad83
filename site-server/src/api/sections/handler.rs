//! Homepage Section Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::core::ServerState;
use crate::db::models::{Section, SectionUpsert};
use crate::db::repository::SectionRepository;
use crate::utils::AppResult;

/// GET /api/sections/{key} - one page region's copy
pub async fn get_by_key(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> AppResult<Json<Section>> {
    let repo = SectionRepository::new(state.store.clone());
    let section = repo
        .find(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Section {key} not found")))?;
    Ok(Json(section))
}

/// PUT /api/sections/{key} - upsert by well-known key (admin)
pub async fn upsert(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    Json(payload): Json<SectionUpsert>,
) -> AppResult<Json<Section>> {
    let repo = SectionRepository::new(state.store.clone());
    let section = repo.upsert(&key, payload).await?;
    tracing::info!(key = %key, "Section saved");
    Ok(Json(section))
}
