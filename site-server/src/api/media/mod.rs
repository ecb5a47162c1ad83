//! Stored File Serving
//!
//! Serves uploaded media under `/media/<folder>/<file>`. Path traversal
//! is refused by the storage layer's resolver.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use http::header;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/media/{*path}", get(serve_file))
}

enum MediaResponse {
    Ok(Bytes, String),
    NotFound,
    BadRequest,
}

impl IntoResponse for MediaResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            MediaResponse::Ok(content, mime) => {
                (http::StatusCode::OK, [(header::CONTENT_TYPE, mime)], content).into_response()
            }
            MediaResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            MediaResponse::BadRequest => {
                (http::StatusCode::BAD_REQUEST, "Invalid path").into_response()
            }
        }
    }
}

async fn serve_file(State(state): State<ServerState>, Path(path): Path<String>) -> MediaResponse {
    let file_path = match state.media.resolve(&path) {
        Ok(p) => p,
        Err(_) => return MediaResponse::BadRequest,
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file_path)
                .first_or_octet_stream()
                .to_string();
            MediaResponse::Ok(content.into(), mime)
        }
        Err(_) => MediaResponse::NotFound,
    }
}
