use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::apply))
        .route("/my-applications", get(handlers::my_applications))
        .route("/gig/:gig_id", get(handlers::gig_applications))
        .route("/:id/status", patch(handlers::update_status))
        .route("/:id", delete(handlers::withdraw))
}
