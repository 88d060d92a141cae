//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes under `/auth`, relative to `/api`.
///
/// ```text
/// POST /token/           -> token
/// POST /token/refresh/   -> refresh
/// POST /logout/          -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token/", post(auth::token))
        .route("/auth/token/refresh/", post(auth::refresh))
        .route("/auth/logout/", post(auth::logout))
}
