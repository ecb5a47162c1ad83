//! Gallery Routes

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/gallery", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/categories",
            get(handler::list_categories).post(handler::create_category),
        )
        .route("/categories/{id}", delete(handler::delete_category))
        .route(
            "/images",
            get(handler::list_images).post(handler::create_image),
        )
        .route("/images/{id}", delete(handler::delete_image))
}
