//! Route definitions for the `/tutorials` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tutorials;
use crate::state::AppState;

/// Routes under `/tutorials`, relative to `/api`.
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
        .route("/tutorials/", get(tutorials::list).post(tutorials::create))
        .route(
            "/tutorials/{id}/",
            get(tutorials::retrieve)
                .put(tutorials::replace)
                .patch(tutorials::partial_update)
                .delete(tutorials::destroy),
        )
}
