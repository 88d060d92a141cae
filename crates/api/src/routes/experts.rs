//! Route definitions for the `/experts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::experts;
use crate::state::AppState;

/// Routes under `/experts`, relative to `/api`.
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
        .route("/experts/", get(experts::list).post(experts::create))
        .route(
            "/experts/{id}/",
            get(experts::retrieve)
                .put(experts::replace)
                .patch(experts::partial_update)
                .delete(experts::destroy),
        )
}
