use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    applications::{
        dto::{ApplyRequest, StatusRequest},
        repo,
    },
    auth::{assert_owner, CurrentUser},
    error::{ApiError, ApiResult},
    gigs::{self, repo::GigStatus},
    state::AppState,
    validate::{within, FieldChecks, JsonBody},
};

#[instrument(skip(state, payload))]
pub async fn apply(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(payload): JsonBody<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mut checks = FieldChecks::new();
    checks.require(
        within(payload.cover_letter.trim(), 50, 2000),
        "coverLetter",
        "must be between 50 and 2000 characters",
    );
    checks.require(
        within(payload.proposed_timeline.trim(), 5, 500),
        "proposedTimeline",
        "must be between 5 and 500 characters",
    );
    checks.require(
        payload.proposed_rate.map_or(true, |r| r >= 0.0),
        "proposedRate",
        "must be a non-negative number",
    );
    checks.finish()?;

    let gig = gigs::repo::find_brief(&state.db, payload.gig_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;

    if gig.status != GigStatus::Open {
        return Err(ApiError::bad_request(
            "This gig is no longer accepting applications",
        ));
    }
    if gig.posted_by == caller.id {
        return Err(ApiError::bad_request("You cannot apply to your own gig"));
    }
    if repo::exists(&state.db, payload.gig_id, caller.id).await? {
        return Err(ApiError::conflict("You have already applied to this gig"));
    }

    // Racing duplicates land on the (gig_id, applicant_id) unique index and
    // come back as the same 409.
    let application_id = repo::create(&state.db, caller.id, &payload).await?;

    info!(
        application_id,
        gig_id = payload.gig_id,
        applicant = caller.id,
        "application submitted"
    );
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Application submitted successfully",
            "applicationId": application_id,
        })),
    ))
}

#[instrument(skip(state))]
pub async fn gig_applications(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(gig_id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let owner = gigs::repo::find_owner(&state.db, gig_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gig not found"))?;
    assert_owner(
        owner,
        caller.id,
        "you can only view applications for your own gigs",
    )?;

    let applications = repo::list_for_gig(&state.db, gig_id).await?;
    Ok(Json(serde_json::json!({ "applications": applications })))
}

#[instrument(skip(state))]
pub async fn my_applications(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let applications = repo::list_for_applicant(&state.db, caller.id).await?;
    Ok(Json(serde_json::json!({ "applications": applications })))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<StatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let found = repo::find_with_gig_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;
    assert_owner(
        found.gig_owner,
        caller.id,
        "you can only manage applications for your own gigs",
    )?;

    repo::set_status(&state.db, id, payload.status).await?;

    info!(application_id = id, status = ?payload.status, "application status updated");
    Ok(Json(serde_json::json!({
        "message": "Application status updated successfully"
    })))
}

#[instrument(skip(state))]
pub async fn withdraw(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let found = repo::find_with_gig_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;
    assert_owner(
        found.application.applicant_id,
        caller.id,
        "you can only withdraw your own applications",
    )?;

    repo::withdraw(&state.db, id, found.application.gig_id).await?;

    info!(application_id = id, "application withdrawn");
    Ok(Json(serde_json::json!({
        "message": "Application withdrawn successfully"
    })))
}
