use axum::{routing::get, Router};

use crate::state::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories))
        .route("/:id", get(handlers::get_category))
}
