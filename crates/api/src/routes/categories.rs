//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes under `/categories`, relative to `/api`.
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
        .route("/categories/", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}/",
            get(categories::retrieve)
                .put(categories::replace)
                .patch(categories::partial_update)
                .delete(categories::destroy),
        )
}
