//! Route definitions for the `/instruments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::instruments;
use crate::state::AppState;

/// Routes under `/instruments`, relative to `/api`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /{id}/                -> retrieve
/// PUT    /{id}/                -> replace
/// PATCH  /{id}/                -> partial_update
/// DELETE /{id}/                -> destroy
/// GET    /{id}/tutorials/      -> tutorials
/// GET    /{id}/tuner-config/   -> tuner_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instruments/", get(instruments::list).post(instruments::create))
        .route(
            "/instruments/{id}/",
            get(instruments::retrieve)
                .put(instruments::replace)
                .patch(instruments::partial_update)
                .delete(instruments::destroy),
        )
        .route("/instruments/{id}/tutorials/", get(instruments::tutorials))
        .route("/instruments/{id}/tuner-config/", get(instruments::tuner_config))
}
