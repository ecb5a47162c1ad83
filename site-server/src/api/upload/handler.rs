//! Image Upload Handler
//!
//! Admin multipart upload: a `folder` field naming the destination and a
//! `file` field with the image bytes. Validation, JPEG re-encoding and
//! naming live in [`crate::storage::MediaStorage`].

use axum::Json;
use axum::extract::{Extension, Multipart, State};

use crate::AppError;
use crate::auth::SessionUser;
use crate::core::ServerState;
use crate::storage::StoredFile;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// POST /api/upload (admin)
pub async fn upload(
    State(state): State<ServerState>,
    Extension(user): Extension<SessionUser>,
    mut multipart: Multipart,
) -> AppResult<Json<StoredFile>> {
    let mut folder: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("folder") => {
                folder = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Invalid folder field: {e}")))?,
                );
            }
            Some("file") => {
                let name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::validation("No filename provided in file field"))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                    .to_vec();
                file = Some((name, bytes));
            }
            _ => {}
        }
    }

    let folder = folder.ok_or_else(|| AppError::validation("No 'folder' field found"))?;
    let (original_name, data) =
        file.ok_or_else(|| AppError::validation("No 'file' field found"))?;
    validate_required_text(&original_name, "filename", MAX_NAME_LEN)?;

    let stored = state.media.upload(&folder, &original_name, &data).await?;

    tracing::info!(
        uid = %user.uid,
        original_name = %original_name,
        path = %stored.path,
        size = stored.size,
        "Image uploaded"
    );

    Ok(Json(stored))
}
