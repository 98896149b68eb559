use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::{assert_owner, CurrentUser},
    categories,
    error::{ApiError, ApiResult},
    gigs::{
        dto::{GigListResponse, GigPayload, ListParams, Pagination},
        repo,
    },
    state::AppState,
    validate::{is_iso_date, within, FieldChecks, JsonBody},
};

fn validate_gig(payload: &GigPayload) -> Result<(), ApiError> {
    let mut checks = FieldChecks::new();
    checks.require(
        within(payload.title.trim(), 5, 200),
        "title",
        "must be between 5 and 200 characters",
    );
    checks.require(
        within(payload.description.trim(), 20, 5000),
        "description",
        "must be between 20 and 5000 characters",
    );
    checks.require(
        payload.category_id >= 1,
        "categoryId",
        "must be a positive integer",
    );
    checks.require(
        payload.budget_min.map_or(true, |b| b >= 0.0),
        "budgetMin",
        "must be a non-negative number",
    );
    checks.require(
        payload.budget_max.map_or(true, |b| b >= 0.0),
        "budgetMax",
        "must be a non-negative number",
    );
    if let (Some(min), Some(max)) = (payload.budget_min, payload.budget_max) {
        checks.require(min <= max, "budgetMax", "must not be less than budgetMin");
    }
    checks.require(
        payload.deadline.as_deref().map_or(true, is_iso_date),
        "deadline",
        "must be an ISO 8601 date",
    );
    checks.finish()
}

#[instrument(skip(state))]
pub async fn list_gigs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<GigListResponse>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let total = repo::count(&state.db, &params).await?;
    let gigs = repo::list(&state.db, &params, limit, offset).await?;

    Ok(Json(GigListResponse {
        gigs,
        pagination: Pagination {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_gig(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    // The increment doubles as the existence check.
    if !repo::bump_views(&state.db, id).await? {
        return Err(ApiError::not_found("Gig not found"));
    }
    let gig = repo::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    Ok(Json(serde_json::json!({ "gig": gig })))
}

#[instrument(skip(state))]
pub async fn my_gigs(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let gigs = repo::list_by_owner(&state.db, caller.id).await?;
    Ok(Json(serde_json::json!({ "gigs": gigs })))
}

#[instrument(skip(state, payload))]
pub async fn create_gig(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(payload): JsonBody<GigPayload>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    validate_gig(&payload)?;

    if categories::repo::find_active(&state.db, payload.category_id)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request("Invalid category"));
    }

    let gig_id = repo::create(&state.db, caller.id, &payload).await?;

    info!(gig_id, owner = caller.id, "gig created");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Gig created successfully",
            "gigId": gig_id,
        })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_gig(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<GigPayload>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_gig(&payload)?;

    let brief = repo::find_brief(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    assert_owner(brief.posted_by, caller.id, "you can only edit your own gigs")?;

    if categories::repo::find_active(&state.db, payload.category_id)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request("Invalid category"));
    }

    let status = payload.status.unwrap_or(brief.status);
    repo::update(&state.db, id, &payload, status).await?;

    info!(gig_id = id, "gig updated");
    Ok(Json(serde_json::json!({
        "message": "Gig updated successfully"
    })))
}

#[instrument(skip(state))]
pub async fn delete_gig(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let owner = repo::find_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    assert_owner(owner, caller.id, "you can only delete your own gigs")?;

    repo::delete(&state.db, id).await?;

    info!(gig_id = id, "gig deleted");
    Ok(Json(serde_json::json!({
        "message": "Gig deleted successfully"
    })))
}
