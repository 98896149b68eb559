use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_gigs).post(handlers::create_gig))
        .route("/my", get(handlers::my_gigs))
        .route(
            "/:id",
            get(handlers::get_gig)
                .put(handlers::update_gig)
                .delete(handlers::delete_gig),
        )
}
