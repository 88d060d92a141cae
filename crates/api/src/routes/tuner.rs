//! Route definitions for the `/tuner-configurations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tuner;
use crate::state::AppState;

/// Routes under `/tuner-configurations`, relative to `/api`.
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
        .route("/tuner-configurations/", get(tuner::list).post(tuner::create))
        .route(
            "/tuner-configurations/{id}/",
            get(tuner::retrieve)
                .put(tuner::replace)
                .patch(tuner::partial_update)
                .delete(tuner::destroy),
        )
}
