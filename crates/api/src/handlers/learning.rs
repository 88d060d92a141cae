//! Handlers for the `/learning` resource (open to every caller).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::types::DbId;
use baja_db::models::learning::{CreateLearningContent, UpdateLearningContent};
use baja_db::repositories::LearningRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::not_found;
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::learning_shape;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/learning/
///
/// Ordered by `order`, then `title`, unless `ordering` says otherwise.
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::List)?;

    let rows =
        LearningRepo::list(&state.pool, &params.learning_filter(), &params.list_query()).await?;
    let data: Vec<_> = rows.into_iter().map(learning_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/learning/
pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateLearningContent>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::Create)?;
    let ValidatedJson(input) = body?;

    let content = LearningRepo::create(&state.pool, &input).await?;

    tracing::info!(
        learning_id = content.id,
        order = content.order,
        user_id = caller.user_id(),
        "Learning content created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: learning_shape(content),
        }),
    ))
}

/// GET /api/learning/{id}/
pub async fn retrieve(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::Retrieve)?;

    let content = LearningRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::LearningContent, id))?;

    Ok(Json(DataResponse {
        data: learning_shape(content),
    }))
}

/// PUT /api/learning/{id}/
pub async fn replace(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateLearningContent>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input.into()).await
}

/// PATCH /api/learning/{id}/
pub async fn partial_update(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateLearningContent>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input).await
}

/// DELETE /api/learning/{id}/
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::LearningContent, Operation::Destroy)?;

    if !LearningRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::LearningContent, id));
    }

    tracing::info!(learning_id = id, user_id = caller.user_id(), "Learning content deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    state: &AppState,
    caller: &Caller,
    id: DbId,
    input: UpdateLearningContent,
) -> AppResult<impl IntoResponse> {
    let content = LearningRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::LearningContent, id))?;

    tracing::info!(learning_id = id, user_id = caller.user_id(), "Learning content updated");

    Ok(Json(DataResponse {
        data: learning_shape(content),
    }))
}
