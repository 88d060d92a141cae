//! Handlers for the `/experts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource, Shape};
use baja_core::error::CoreError;
use baja_core::media::stored_path_from_reference;
use baja_core::types::DbId;
use baja_db::models::expert::{CreateExpert, Expert, UpdateExpert};
use baja_db::repositories::{ExpertRepo, InstrumentRepo};
use baja_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{RequestOrigin, ValidatedJson};
use crate::handlers::not_found;
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::{expert_detail_shape, expert_list_shape, ExpertView, FileUrls};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/experts/
///
/// Filter: `instrument` (id).
pub async fn list(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::List)?;

    let rows =
        ExpertRepo::list(&state.pool, &params.expert_filter(), &params.list_query()).await?;

    let urls = FileUrls::new(&state.config.media, &origin);
    let data: Vec<_> = rows
        .into_iter()
        .map(|row| expert_list_shape(row, &urls))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/experts/
pub async fn create(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateExpert>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::Create)?;
    let ValidatedJson(mut input) = body?;

    stored_file_paths(
        &state,
        [
            &mut input.photo,
            &mut input.performance_video,
            &mut input.teaching_audio,
        ],
    );
    if let Some(ids) = input.instrument_ids.as_deref() {
        check_instruments(&state.pool, ids).await?;
    }

    let expert = ExpertRepo::create(&state.pool, &input).await?;

    tracing::info!(
        expert_id = expert.id,
        instruments = expert.instrument_names.len(),
        user_id = caller.user_id(),
        "Expert created",
    );

    let data = render(&state, &origin, Operation::Create, expert).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/experts/{id}/
pub async fn retrieve(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::Retrieve)?;

    let expert = ExpertRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Expert, id))?;

    let data = render(&state, &origin, Operation::Retrieve, expert).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/experts/{id}/
pub async fn replace(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateExpert>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, Operation::Update, id, input.into()).await
}

/// PATCH /api/experts/{id}/
///
/// `instrument_ids`, when present, replaces the expert's instrument links.
pub async fn partial_update(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateExpert>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, Operation::PartialUpdate, id, input).await
}

/// DELETE /api/experts/{id}/
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Expert, Operation::Destroy)?;

    if !ExpertRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Expert, id));
    }

    tracing::info!(expert_id = id, user_id = caller.user_id(), "Expert deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn apply_update(
    state: &AppState,
    origin: &RequestOrigin,
    caller: &Caller,
    op: Operation,
    id: DbId,
    mut input: UpdateExpert,
) -> AppResult<impl IntoResponse> {
    stored_file_paths(
        state,
        [
            &mut input.photo,
            &mut input.performance_video,
            &mut input.teaching_audio,
        ],
    );
    if let Some(ids) = input.instrument_ids.as_deref() {
        check_instruments(&state.pool, ids).await?;
    }

    let expert = ExpertRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Expert, id))?;

    tracing::info!(
        expert_id = id,
        links_replaced = input.instrument_ids.is_some(),
        user_id = caller.user_id(),
        "Expert updated",
    );

    let data = render(state, origin, op, expert).await?;
    Ok(Json(DataResponse { data }))
}

/// File references echoed back as URLs are stored as their media path.
fn stored_file_paths(state: &AppState, files: [&mut Option<String>; 3]) {
    let prefix = state.config.media.url_prefix.as_str();
    for file in files {
        *file = file
            .take()
            .map(|reference| stored_path_from_reference(prefix, &reference));
    }
}

async fn check_instruments(pool: &DbPool, ids: &[DbId]) -> AppResult<()> {
    let missing = InstrumentRepo::missing_ids(pool, ids).await?;
    if missing.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
    Err(CoreError::field(
        "instrument_ids",
        format!("Unknown instrument id(s): {}", listed.join(", ")),
    )
    .into())
}

/// Shape an expert for the response of `op`.
async fn render(
    state: &AppState,
    origin: &RequestOrigin,
    op: Operation,
    expert: Expert,
) -> AppResult<ExpertView> {
    let urls = FileUrls::new(&state.config.media, origin);

    Ok(match Shape::for_operation(op) {
        Shape::List => ExpertView::List(expert_list_shape(expert, &urls)),
        Shape::Detail => {
            let instruments = InstrumentRepo::list_for_expert(&state.pool, expert.id).await?;
            ExpertView::Detail(Box::new(expert_detail_shape(expert, instruments, &urls)))
        }
    })
}
