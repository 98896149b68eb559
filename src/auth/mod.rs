use axum::{
    routing::{get, post},
    Router,
};

use crate::{error::ApiError, state::AppState};

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub use claims::Claims;
pub use extractors::CurrentUser;
pub use jwt::JwtKeys;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
}

/// Single ownership gate shared by every resource handler that mutates
/// owner-scoped rows.
pub fn assert_owner(owner_id: i64, caller_id: i64, denial: &str) -> Result<(), ApiError> {
    if owner_id != caller_id {
        return Err(ApiError::forbidden(format!("Unauthorized: {denial}")));
    }
    Ok(())
}
