use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UserProfile},
        password::{hash_password, verify_password},
        repo, CurrentUser, JwtKeys,
    },
    error::{ApiError, ApiResult},
    state::AppState,
    validate::{is_strong_password, is_valid_email, within, FieldChecks, JsonBody},
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();

    let mut checks = FieldChecks::new();
    checks.require(
        is_valid_email(&payload.email),
        "email",
        "must be a valid email address",
    );
    checks.require(
        within(&full_name, 2, 100),
        "fullName",
        "must be between 2 and 100 characters",
    );
    checks.require(
        is_strong_password(&payload.password),
        "password",
        "must be at least 8 characters with a lowercase letter, an uppercase letter and a digit",
    );
    checks.finish()?;

    if repo::email_taken(&state.db, &payload.email).await? {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("User already exists with this email"));
    }

    let hash = hash_password(&payload.password, &state.config.hash)?;
    // The unique index backstops the check above if two registrations race;
    // the collision surfaces as the same 409.
    let user = repo::create(&state.db, &payload.email, &full_name, &hash, payload.role).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email, user.role)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(mut payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    let mut checks = FieldChecks::new();
    checks.require(
        is_valid_email(&payload.email),
        "email",
        "must be a valid email address",
    );
    checks.require(!payload.password.is_empty(), "password", "must not be empty");
    checks.finish()?;

    let user = match repo::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    // Accounts created through an external provider have no local password.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = user.id, "login without local credentials");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    repo::touch(&state.db, user.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email, user.role)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        user: PublicUser::from(&user),
        token,
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<Json<serde_json::Value>> {
    let user = repo::find_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(serde_json::json!({ "user": UserProfile::from(user) })))
}

/// Stateless tokens cannot be revoked server-side; logout simply confirms.
#[instrument]
pub async fn logout(_caller: CurrentUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Logged out successfully" }))
}
