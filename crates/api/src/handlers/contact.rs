//! Handlers for the `/contact` resource.
//!
//! Anyone may submit a message; reading and managing messages is reserved
//! for admins. `is_read` starts false and only changes through an admin
//! update or the bulk `mark-read` / `mark-unread` actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::types::DbId;
use baja_db::models::contact::{ContactIds, CreateContact, ReplaceContact, UpdateContact};
use baja_db::repositories::ContactRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::not_found;
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::contact_shape;
use crate::response::{DataResponse, UpdatedCount};
use crate::state::AppState;

/// GET /api/contact/
///
/// Newest first. Filter: `is_read`.
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::List)?;

    let rows =
        ContactRepo::list(&state.pool, &params.contact_filter(), &params.list_query()).await?;
    let data: Vec<_> = rows.into_iter().map(contact_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/contact/
///
/// Public. Any `is_read` / `created_at` in the body is ignored.
pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateContact>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::Create)?;
    let ValidatedJson(input) = body?;

    let contact = ContactRepo::create(&state.pool, &input).await?;

    tracing::info!(contact_id = contact.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: contact_shape(contact),
        }),
    ))
}

/// GET /api/contact/{id}/
pub async fn retrieve(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::Retrieve)?;

    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Contact, id))?;

    Ok(Json(DataResponse {
        data: contact_shape(contact),
    }))
}

/// PUT /api/contact/{id}/
pub async fn replace(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<ReplaceContact>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input.into()).await
}

/// PATCH /api/contact/{id}/
pub async fn partial_update(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateContact>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input).await
}

/// DELETE /api/contact/{id}/
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::Destroy)?;

    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Contact, id));
    }

    tracing::info!(contact_id = id, user_id = caller.user_id(), "Contact message deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/contact/mark-read/
///
/// Body `{"ids": [..]}`; responds with the number of messages matched.
pub async fn mark_read(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<ContactIds>, AppError>,
) -> AppResult<impl IntoResponse> {
    set_read(&state, &caller, body, true).await
}

/// POST /api/contact/mark-unread/
pub async fn mark_unread(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<ContactIds>, AppError>,
) -> AppResult<impl IntoResponse> {
    set_read(&state, &caller, body, false).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn apply_update(
    state: &AppState,
    caller: &Caller,
    id: DbId,
    input: UpdateContact,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Contact, id))?;

    tracing::info!(contact_id = id, user_id = caller.user_id(), "Contact message updated");

    Ok(Json(DataResponse {
        data: contact_shape(contact),
    }))
}

async fn set_read(
    state: &AppState,
    caller: &Caller,
    body: Result<ValidatedJson<ContactIds>, AppError>,
    is_read: bool,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Contact, Operation::BulkAction)?;
    let ValidatedJson(ContactIds { ids }) = body?;

    let updated = ContactRepo::set_read(&state.pool, &ids, is_read).await?;

    tracing::info!(
        requested = ids.len(),
        updated,
        is_read,
        user_id = caller.user_id(),
        "Contact read state changed",
    );

    Ok(Json(DataResponse {
        data: UpdatedCount { updated },
    }))
}
