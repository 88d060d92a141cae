pub mod auth;
pub mod categories;
pub mod contact;
pub mod experts;
pub mod health;
pub mod instruments;
pub mod learning;
pub mod media;
pub mod tuner;
pub mod tutorials;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/token/                          obtain token pair (public)
/// /auth/token/refresh/                  rotate refresh token (public)
/// /auth/logout/                         revoke sessions (requires auth)
///
/// /categories/                          list, create
/// /categories/{id}/                     get, put, patch, delete
///
/// /instruments/                         list, create
/// /instruments/{id}/                    get (detail shape), put, patch, delete
/// /instruments/{id}/tutorials/          tutorials of the instrument
/// /instruments/{id}/tuner-config/       tuner configuration or null
///
/// /media/                               list, create
/// /media/upload/                        multipart upload
/// /media/{id}/                          get, put, patch, delete
///
/// /experts/                             list, create
/// /experts/{id}/                        get (detail shape), put, patch, delete
///
/// /learning/                            list, create (open)
/// /learning/{id}/                       get, put, patch, delete (open)
///
/// /contact/                             list (admin), create (public)
/// /contact/mark-read/                   bulk mark read (admin)
/// /contact/mark-unread/                 bulk mark unread (admin)
/// /contact/{id}/                        get, put, patch, delete (admin)
///
/// /tutorials/                           list, create
/// /tutorials/{id}/                      get, put, patch, delete
///
/// /tuner-configurations/                list, create
/// /tuner-configurations/{id}/           get, put, patch, delete
/// ```
///
/// Reads are public unless noted; writes need an admin unless noted. The
/// policy itself lives in `baja_core::access`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(categories::router())
        .merge(instruments::router())
        .merge(media::router())
        .merge(experts::router())
        .merge(learning::router())
        .merge(contact::router())
        .merge(tutorials::router())
        .merge(tuner::router())
}
