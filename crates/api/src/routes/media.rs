//! Route definitions for the `/media` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes under `/media`, relative to `/api`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// POST   /upload/    -> upload (multipart)
/// GET    /{id}/      -> retrieve
/// PUT    /{id}/      -> replace
/// PATCH  /{id}/      -> partial_update
/// DELETE /{id}/      -> destroy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/media/", get(media::list).post(media::create))
        .route("/media/upload/", post(media::upload))
        .route(
            "/media/{id}/",
            get(media::retrieve)
                .put(media::replace)
                .patch(media::partial_update)
                .delete(media::destroy),
        )
}
