use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::UserProfile, repo as accounts, CurrentUser},
    error::{ApiError, ApiResult},
    state::AppState,
    users::{dto::UpdateProfileRequest, repo},
    validate::{within, FieldChecks, JsonBody},
};

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let user = accounts::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(serde_json::json!({ "user": UserProfile::from(user) })))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut checks = FieldChecks::new();
    checks.require(
        within(payload.full_name.trim(), 2, 100),
        "fullName",
        "must be between 2 and 100 characters",
    );
    checks.finish()?;

    repo::update_profile(&state.db, caller.id, &payload).await?;

    info!(user_id = caller.id, "profile updated");
    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully"
    })))
}
