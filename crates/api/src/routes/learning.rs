//! Route definitions for the `/learning` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::learning;
use crate::state::AppState;

/// Routes under `/learning`, relative to `/api`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}/   -> retrieve
/// PUT    /{id}/   -> replace
/// PATCH  /{id}/   -> partial_update
/// DELETE /{id}/   -> destroy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/learning/", get(learning::list).post(learning::create))
        .route(
            "/learning/{id}/",
            get(learning::retrieve)
                .put(learning::replace)
                .patch(learning::partial_update)
                .delete(learning::destroy),
        )
}
