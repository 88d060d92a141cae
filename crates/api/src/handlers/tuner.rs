//! Handlers for the `/tuner-configurations` resource.
//!
//! Notes and frequencies are paired by position, so every write checks the
//! pair as it will be stored (PATCH merges with the current row first).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::tuner::validate_pairing;
use baja_core::types::DbId;
use baja_db::models::tuner::{CreateTunerConfiguration, UpdateTunerConfiguration};
use baja_db::repositories::TunerRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::{ensure_instrument, not_found};
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::tuner_shape;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/tuner-configurations/
///
/// Filters: `instrument` (id), `is_default`.
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::List)?;

    let rows = TunerRepo::list(&state.pool, &params.tuner_filter(), &params.list_query()).await?;
    let data: Vec<_> = rows.into_iter().map(tuner_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/tuner-configurations/
///
/// One configuration per instrument; a second one is a 409.
pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateTunerConfiguration>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::Create)?;
    let ValidatedJson(input) = body?;

    validate_pairing(&input.notes, &input.frequencies)?;
    ensure_instrument(&state.pool, input.instrument).await?;

    let config = TunerRepo::create(&state.pool, &input).await?;

    tracing::info!(
        tuner_id = config.id,
        instrument_id = config.instrument_id,
        notes = config.notes.len(),
        user_id = caller.user_id(),
        "Tuner configuration created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: tuner_shape(config),
        }),
    ))
}

/// GET /api/tuner-configurations/{id}/
pub async fn retrieve(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::Retrieve)?;

    let config = TunerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::TunerConfiguration, id))?;

    Ok(Json(DataResponse {
        data: tuner_shape(config),
    }))
}

/// PUT /api/tuner-configurations/{id}/
pub async fn replace(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateTunerConfiguration>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input.into()).await
}

/// PATCH /api/tuner-configurations/{id}/
pub async fn partial_update(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateTunerConfiguration>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input).await
}

/// DELETE /api/tuner-configurations/{id}/
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::TunerConfiguration, Operation::Destroy)?;

    if !TunerRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::TunerConfiguration, id));
    }

    tracing::info!(tuner_id = id, user_id = caller.user_id(), "Tuner configuration deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn apply_update(
    state: &AppState,
    caller: &Caller,
    id: DbId,
    input: UpdateTunerConfiguration,
) -> AppResult<impl IntoResponse> {
    let existing = TunerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::TunerConfiguration, id))?;

    validate_pairing(
        input.notes.as_deref().unwrap_or(&existing.notes),
        input.frequencies.as_deref().unwrap_or(&existing.frequencies),
    )?;

    if let Some(instrument_id) = input.instrument {
        ensure_instrument(&state.pool, instrument_id).await?;
    }

    let config = TunerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::TunerConfiguration, id))?;

    tracing::info!(tuner_id = id, user_id = caller.user_id(), "Tuner configuration updated");

    Ok(Json(DataResponse {
        data: tuner_shape(config),
    }))
}
