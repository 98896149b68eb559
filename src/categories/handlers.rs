use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use crate::{
    categories::repo,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let categories = repo::list_active(&state.db).await?;
    Ok(Json(serde_json::json!({ "categories": categories })))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let category = repo::find_active(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(Json(serde_json::json!({ "category": category })))
}
