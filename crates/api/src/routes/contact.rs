//! Route definitions for the `/contact` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Routes under `/contact`, relative to `/api`.
///
/// ```text
/// GET    /               -> list (admin)
/// POST   /               -> create (public)
/// POST   /mark-read/     -> mark_read (admin)
/// POST   /mark-unread/   -> mark_unread (admin)
/// GET    /{id}/          -> retrieve (admin)
/// PUT    /{id}/          -> replace (admin)
/// PATCH  /{id}/          -> partial_update (admin)
/// DELETE /{id}/          -> destroy (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact/", get(contact::list).post(contact::create))
        .route("/contact/mark-read/", post(contact::mark_read))
        .route("/contact/mark-unread/", post(contact::mark_unread))
        .route(
            "/contact/{id}/",
            get(contact::retrieve)
                .put(contact::replace)
                .patch(contact::partial_update)
                .delete(contact::destroy),
        )
}
