//! Handlers for the `/instruments` resource and its sub-resources.
//!
//! Instruments are written in the flat shape (`category` is a category name
//! or slug) and read back in either the flat list shape or, for single
//! retrieval, the nested detail shape with media, experts and the derived
//! `audio_sample` / `model_3d` URLs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource, Shape};
use baja_core::error::CoreError;
use baja_core::media::stored_path_from_reference;
use baja_core::types::DbId;
use baja_db::models::category::Category;
use baja_db::models::instrument::{CreateInstrument, Instrument, UpdateInstrument};
use baja_db::repositories::{CategoryRepo, ExpertRepo, InstrumentRepo, MediaRepo};
use baja_db::repositories::{TunerRepo, TutorialRepo};
use baja_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{RequestOrigin, ValidatedJson};
use crate::handlers::not_found;
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::{
    instrument_detail_shape, instrument_list_shape, tuner_shape, tutorial_shape, FileUrls,
    InstrumentView,
};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/instruments/
///
/// Filters: `category` (slug), `region`, `is_featured`; plus `search`,
/// `ordering`, `limit`, `offset`.
pub async fn list(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::List)?;

    let rows = InstrumentRepo::list(
        &state.pool,
        &params.instrument_filter(),
        &params.list_query(),
    )
    .await?;

    let urls = FileUrls::new(&state.config.media, &origin);
    let data: Vec<_> = rows
        .into_iter()
        .map(|row| instrument_list_shape(row, &urls))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/instruments/
pub async fn create(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateInstrument>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::Create)?;
    let ValidatedJson(mut input) = body?;

    let category = resolve_category(&state.pool, &input.category).await?;
    input.image = stored_image(&state, input.image.take());

    let instrument = InstrumentRepo::create(&state.pool, category.id, &input).await?;

    tracing::info!(
        instrument_id = instrument.id,
        category_id = category.id,
        user_id = caller.user_id(),
        "Instrument created",
    );

    let data = render(&state, &origin, Operation::Create, instrument).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/instruments/{id}/
pub async fn retrieve(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::Retrieve)?;

    let instrument = InstrumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Instrument, id))?;

    let data = render(&state, &origin, Operation::Retrieve, instrument).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/instruments/{id}/
pub async fn replace(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateInstrument>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, Operation::Update, id, input.into()).await
}

/// PATCH /api/instruments/{id}/
pub async fn partial_update(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateInstrument>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, Operation::PartialUpdate, id, input).await
}

/// DELETE /api/instruments/{id}/
///
/// Media, tutorials, the tuner configuration and expert links go with it.
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::Destroy)?;

    if !InstrumentRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Instrument, id));
    }

    tracing::info!(instrument_id = id, user_id = caller.user_id(), "Instrument deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/instruments/{id}/tutorials/
///
/// Newest first; an empty list when the instrument has none.
pub async fn tutorials(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::SubResource)?;

    if !InstrumentRepo::exists(&state.pool, id).await? {
        return Err(not_found(Resource::Instrument, id));
    }

    let rows = TutorialRepo::list_for_instrument(&state.pool, id).await?;
    let data: Vec<_> = rows.into_iter().map(tutorial_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/instruments/{id}/tuner-config/
///
/// `{"data": null}` when the instrument has no tuner configuration.
pub async fn tuner_config(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Instrument, Operation::SubResource)?;

    if !InstrumentRepo::exists(&state.pool, id).await? {
        return Err(not_found(Resource::Instrument, id));
    }

    let config = TunerRepo::find_for_instrument(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: config.map(tuner_shape),
    }))
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
    mut input: UpdateInstrument,
) -> AppResult<impl IntoResponse> {
    let category_id = match input.category.as_deref() {
        Some(name) => Some(resolve_category(&state.pool, name).await?.id),
        None => None,
    };
    input.image = stored_image(state, input.image.take());

    let instrument = InstrumentRepo::update(&state.pool, id, category_id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Instrument, id))?;

    tracing::info!(instrument_id = id, user_id = caller.user_id(), "Instrument updated");

    let data = render(state, origin, op, instrument).await?;
    Ok(Json(DataResponse { data }))
}

/// Shape an instrument for the response of `op`.
async fn render(
    state: &AppState,
    origin: &RequestOrigin,
    op: Operation,
    instrument: Instrument,
) -> AppResult<InstrumentView> {
    let urls = FileUrls::new(&state.config.media, origin);

    Ok(match Shape::for_operation(op) {
        Shape::List => InstrumentView::List(instrument_list_shape(instrument, &urls)),
        Shape::Detail => {
            let media = MediaRepo::list_for_instrument(&state.pool, instrument.id).await?;
            let experts = ExpertRepo::list_for_instrument(&state.pool, instrument.id).await?;
            InstrumentView::Detail(Box::new(instrument_detail_shape(
                instrument, media, experts, &urls,
            )))
        }
    })
}

/// Category by name (case-insensitive), falling back to slug.
async fn resolve_category(pool: &DbPool, value: &str) -> AppResult<Category> {
    CategoryRepo::find_by_name_or_slug(pool, value)
        .await?
        .ok_or_else(|| {
            CoreError::field("category", format!("Category '{value}' does not exist")).into()
        })
}

/// Image references echoed back as URLs are stored as their media path.
fn stored_image(state: &AppState, image: Option<String>) -> Option<String> {
    image.map(|reference| stored_path_from_reference(&state.config.media.url_prefix, &reference))
}
