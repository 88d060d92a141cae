//! Handlers for the `/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::error::CoreError;
use baja_core::slug::{generate_slug, validate_slug, MAX_SLUG_LEN};
use baja_core::types::DbId;
use baja_db::models::category::{CreateCategory, UpdateCategory};
use baja_db::repositories::CategoryRepo;
use baja_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::handlers::not_found;
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::category_shape;
use crate::response::DataResponse;
use crate::state::AppState;

/// Room left for a `-N` suffix when a derived slug collides.
const SLUG_SUFFIX_RESERVE: usize = 8;

/// GET /api/categories/
pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::List)?;

    let rows = CategoryRepo::list(&state.pool, &params.list_query()).await?;
    let data: Vec<_> = rows.into_iter().map(category_shape).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/categories/
///
/// Without an explicit `slug` one is derived from the name, suffixed
/// `-2`, `-3`, ... until unique. An explicit duplicate slug is a 409.
pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateCategory>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::Create)?;
    let ValidatedJson(input) = body?;

    let slug = slug_for_new_category(&state.pool, &input).await?;
    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        user_id = caller.user_id(),
        "Category created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: category_shape(category),
        }),
    ))
}

/// GET /api/categories/{id}/
pub async fn retrieve(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::Retrieve)?;

    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Category, id))?;

    Ok(Json(DataResponse {
        data: category_shape(category),
    }))
}

/// PUT /api/categories/{id}/
///
/// Renaming keeps the existing slug unless a new one is given.
pub async fn replace(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateCategory>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input.into()).await
}

/// PATCH /api/categories/{id}/
pub async fn partial_update(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateCategory>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &caller, id, input).await
}

/// DELETE /api/categories/{id}/
///
/// Refused with 409 while any instrument still belongs to the category.
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Category, Operation::Destroy)?;

    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Category, id))?;

    let in_use = CategoryRepo::count_instruments(&state.pool, id).await?;
    if in_use > 0 {
        return Err(CoreError::Conflict(format!(
            "Category '{}' still has {in_use} instrument(s) and cannot be deleted",
            category.name
        ))
        .into());
    }

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Category, id));
    }

    tracing::info!(category_id = id, user_id = caller.user_id(), "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn apply_update(
    state: &AppState,
    caller: &Caller,
    id: DbId,
    input: UpdateCategory,
) -> AppResult<impl IntoResponse> {
    if let Some(slug) = input.slug.as_deref() {
        validate_slug(slug)?;
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Category, id))?;

    tracing::info!(category_id = id, user_id = caller.user_id(), "Category updated");

    Ok(Json(DataResponse {
        data: category_shape(category),
    }))
}

async fn slug_for_new_category(pool: &DbPool, input: &CreateCategory) -> AppResult<String> {
    if let Some(slug) = input.slug.as_deref() {
        validate_slug(slug)?;
        return Ok(slug.to_string());
    }

    let mut base = generate_slug(&input.name);
    if base.is_empty() {
        base = "category".to_string();
    }
    base.truncate(MAX_SLUG_LEN - SLUG_SUFFIX_RESERVE);
    let base = base.trim_end_matches('-');

    Ok(CategoryRepo::next_available_slug(pool, base).await?)
}
