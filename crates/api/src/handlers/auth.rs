//! Handlers for the `/auth` resource (token, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::error::CoreError;
use baja_core::types::DbId;
use baja_db::models::session::NewRefreshSession;
use baja_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{refresh_digest, RefreshToken};
use crate::auth::password::{verify_against_placeholder, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/token/`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request body for `POST /auth/token/refresh/`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}

/// Access + refresh token pair returned by both token endpoints.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/token/
///
/// Exchange username + password for a token pair. Unknown users, wrong
/// passwords and deactivated accounts all answer 401 with the same message.
pub async fn token(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TokenRequest>,
) -> AppResult<impl IntoResponse> {
    let Some(user) = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .filter(|u| u.is_active)
    else {
        verify_against_placeholder(&input.password);
        return Err(invalid_credentials());
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let pair = issue_tokens(&state, user.id, &user.role).await?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(DataResponse { data: pair }))
}

/// POST /api/auth/token/refresh/
///
/// Rotate a refresh token: the presented token is revoked and a new pair is
/// issued. A token can be used once.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let session = SessionRepo::find_live(&state.pool, &refresh_digest(&input.refresh))
        .await?
        .ok_or_else(invalid_refresh_token)?;

    // Losing this race means another request already rotated the token.
    if !SessionRepo::consume(&state.pool, session.id).await? {
        return Err(invalid_refresh_token());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(invalid_refresh_token)?;

    let pair = issue_tokens(&state, user.id, &user.role).await?;

    tracing::info!(user_id = user.id, "Refresh token rotated");

    Ok(Json(DataResponse { data: pair }))
}

/// POST /api/auth/logout/
///
/// Revoke every refresh token of the authenticated user.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_for_user(&state.pool, user.user_id).await?;

    tracing::info!(user_id = user.user_id, revoked, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign an access token and open a session for a fresh refresh token.
///
/// The user's consumed and expired sessions are dropped on the way.
async fn issue_tokens(state: &AppState, user_id: DbId, role: &str) -> AppResult<TokenPair> {
    let jwt = &state.config.jwt;
    let access = jwt
        .sign_access(user_id, role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let purged = SessionRepo::purge_dead_for_user(&state.pool, user_id).await?;
    if purged > 0 {
        tracing::debug!(user_id, purged, "Dropped dead refresh sessions");
    }

    let refresh = RefreshToken::mint();
    SessionRepo::open(
        &state.pool,
        &NewRefreshSession {
            user_id,
            refresh_token_hash: refresh.digest,
            expires_at: jwt.refresh_expires_at(chrono::Utc::now()),
        },
    )
    .await?;

    Ok(TokenPair {
        access,
        refresh: refresh.token,
        expires_in: jwt.access_token_ttl_secs(),
    })
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "No active account found with the given credentials".into(),
    ))
}

fn invalid_refresh_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Refresh token is invalid, expired or already used".into(),
    ))
}
