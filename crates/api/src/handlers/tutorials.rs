//! Handlers for the `/tutorials` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::types::DbId;
use baja_db::models::tutorial::{CreateTutorial, UpdateTutorial};
use baja_db::repositories::TutorialRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::{ensure_instrument, not_found};
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::tutorial_shape;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/tutorials/
///
/// Newest first. Filter: `instrument` (id).
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::List)?;

    let rows =
        TutorialRepo::list(&state.pool, &params.tutorial_filter(), &params.list_query()).await?;
    let data: Vec<_> = rows.into_iter().map(tutorial_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/tutorials/
pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateTutorial>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::Create)?;
    let ValidatedJson(input) = body?;
    ensure_instrument(&state.pool, input.instrument).await?;

    let tutorial = TutorialRepo::create(&state.pool, &input).await?;

    tracing::info!(
        tutorial_id = tutorial.id,
        instrument_id = tutorial.instrument_id,
        user_id = caller.user_id(),
        "Tutorial created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: tutorial_shape(tutorial),
        }),
    ))
}

/// GET /api/tutorials/{id}/
pub async fn retrieve(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::Retrieve)?;

    let tutorial = TutorialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Tutorial, id))?;

    Ok(Json(DataResponse {
        data: tutorial_shape(tutorial),
    }))
}

/// PUT /api/tutorials/{id}/
pub async fn replace(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateTutorial>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input.into()).await
}

/// PATCH /api/tutorials/{id}/
pub async fn partial_update(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateTutorial>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input).await
}

/// DELETE /api/tutorials/{id}/
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Tutorial, Operation::Destroy)?;

    if !TutorialRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Tutorial, id));
    }

    tracing::info!(tutorial_id = id, user_id = caller.user_id(), "Tutorial deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    state: &AppState,
    caller: &Caller,
    id: DbId,
    input: UpdateTutorial,
) -> AppResult<impl IntoResponse> {
    if let Some(instrument_id) = input.instrument {
        ensure_instrument(&state.pool, instrument_id).await?;
    }

    let tutorial = TutorialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Tutorial, id))?;

    tracing::info!(tutorial_id = id, user_id = caller.user_id(), "Tutorial updated");

    Ok(Json(DataResponse {
        data: tutorial_shape(tutorial),
    }))
}
