//! Handlers for the `/media` resource, including multipart upload.
//!
//! Whatever path a write takes (JSON create, PUT, PATCH, upload), the
//! resulting `(media_type, file)` pair goes through
//! [`validate_media_file`] before anything is persisted.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use baja_core::access::{Operation, Resource};
use baja_core::error::CoreError;
use baja_core::media::{stored_path_from_reference, validate_media_file, MediaType};
use baja_core::query::parse_bool_filter;
use baja_core::types::DbId;
use baja_db::models::media::{CreateMedia, UpdateMedia};
use baja_db::repositories::{MediaRepo, NewMedia};

use crate::error::{AppError, AppResult};
use crate::extract::{RequestOrigin, ValidatedJson};
use crate::handlers::{ensure_instrument, not_found};
use crate::middleware::auth::Caller;
use crate::query::ListParams;
use crate::representation::{media_shape, FileUrls};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::sanitize_file_name;

/// Longest accepted media title, matching `media.title`.
const MAX_TITLE_LEN: usize = 150;

/// GET /api/media/
///
/// Filters: `instrument`, `media_type`, `is_primary`.
pub async fn list(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::List)?;

    let rows = MediaRepo::list(&state.pool, &params.media_filter(), &params.list_query()).await?;

    let urls = FileUrls::new(&state.config.media, &origin);
    let data: Vec<_> = rows.into_iter().map(|m| media_shape(m, &urls)).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/media/
///
/// Registers a file that is already in storage (or hosted elsewhere).
pub async fn create(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    body: Result<ValidatedJson<CreateMedia>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::Create)?;
    let ValidatedJson(input) = body?;

    let media_type: MediaType = input.media_type.parse()?;
    let file = stored_path_from_reference(&state.config.media.url_prefix, &input.file);
    validate_media_file(media_type, &file)?;
    ensure_instrument(&state.pool, input.instrument).await?;

    let media = MediaRepo::create(
        &state.pool,
        &NewMedia {
            instrument_id: input.instrument,
            media_type: media_type.as_str(),
            file: &file,
            title: &input.title,
            is_primary: input.is_primary,
        },
    )
    .await?;

    tracing::info!(
        media_id = media.id,
        instrument_id = media.instrument_id,
        media_type = %media.media_type,
        user_id = caller.user_id(),
        "Media created",
    );

    let urls = FileUrls::new(&state.config.media, &origin);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: media_shape(media, &urls),
        }),
    ))
}

/// GET /api/media/{id}/
pub async fn retrieve(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::Retrieve)?;

    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Media, id))?;

    let urls = FileUrls::new(&state.config.media, &origin);
    Ok(Json(DataResponse {
        data: media_shape(media, &urls),
    }))
}

/// PUT /api/media/{id}/
pub async fn replace(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<CreateMedia>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::Update)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, id, input.into()).await
}

/// PATCH /api/media/{id}/
///
/// The extension rule is checked against the merged row, so changing only
/// `media_type` to `model_3d` is refused when the stored file does not fit.
pub async fn partial_update(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Result<ValidatedJson<UpdateMedia>, AppError>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::PartialUpdate)?;
    let ValidatedJson(input) = body?;
    apply_update(&state, &origin, &caller, id, input).await
}

/// DELETE /api/media/{id}/
///
/// Only the row is removed; the stored file stays in place.
pub async fn destroy(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::Destroy)?;

    if !MediaRepo::delete(&state.pool, id).await? {
        return Err(not_found(Resource::Media, id));
    }

    tracing::info!(media_id = id, user_id = caller.user_id(), "Media deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/media/upload/
///
/// Multipart form with `instrument`, `media_type`, optional `title` and
/// `is_primary`, and a single `file` part. Validation happens before the
/// file is written.
pub async fn upload(
    caller: Caller,
    origin: RequestOrigin,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    caller.authorize(Resource::Media, Operation::Upload)?;
    let mut multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
    })?;

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.file = Some((file_name, bytes.to_vec()));
            }
            "instrument" => form.instrument = Some(field.text().await.map_err(bad_multipart)?),
            "media_type" => form.media_type = Some(field.text().await.map_err(bad_multipart)?),
            "title" => form.title = Some(field.text().await.map_err(bad_multipart)?),
            "is_primary" => form.is_primary = Some(field.text().await.map_err(bad_multipart)?),
            _ => {}
        }
    }

    let upload = form.validate()?;
    ensure_instrument(&state.pool, upload.instrument_id).await?;

    let stored = state
        .storage
        .save(&upload.file_name, &upload.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let media = MediaRepo::create(
        &state.pool,
        &NewMedia {
            instrument_id: upload.instrument_id,
            media_type: upload.media_type.as_str(),
            file: &stored,
            title: &upload.title,
            is_primary: upload.is_primary,
        },
    )
    .await?;

    tracing::info!(
        media_id = media.id,
        instrument_id = media.instrument_id,
        file = %media.file,
        size = upload.bytes.len(),
        user_id = caller.user_id(),
        "Media uploaded",
    );

    let urls = FileUrls::new(&state.config.media, &origin);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: media_shape(media, &urls),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn apply_update(
    state: &AppState,
    origin: &RequestOrigin,
    caller: &Caller,
    id: DbId,
    mut input: UpdateMedia,
) -> AppResult<impl IntoResponse> {
    let existing = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(Resource::Media, id))?;

    input.file = input
        .file
        .map(|f| stored_path_from_reference(&state.config.media.url_prefix, &f));

    let media_type: MediaType = input
        .media_type
        .as_deref()
        .unwrap_or(&existing.media_type)
        .parse()?;
    validate_media_file(media_type, input.file.as_deref().unwrap_or(&existing.file))?;
    input.media_type = input.media_type.map(|_| media_type.as_str().to_string());

    if let Some(instrument_id) = input.instrument {
        ensure_instrument(&state.pool, instrument_id).await?;
    }

    let media = MediaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(Resource::Media, id))?;

    tracing::info!(media_id = id, user_id = caller.user_id(), "Media updated");

    let urls = FileUrls::new(&state.config.media, origin);
    Ok(Json(DataResponse {
        data: media_shape(media, &urls),
    }))
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

/// Raw multipart fields, collected before any of them is trusted.
#[derive(Debug, Default)]
struct UploadForm {
    instrument: Option<String>,
    media_type: Option<String>,
    title: Option<String>,
    is_primary: Option<String>,
    file: Option<(String, Vec<u8>)>,
}

#[derive(Debug)]
struct ValidUpload {
    instrument_id: DbId,
    media_type: MediaType,
    title: String,
    is_primary: bool,
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadForm {
    fn validate(self) -> Result<ValidUpload, CoreError> {
        let instrument_id = self
            .instrument
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::field("instrument", "This field is required"))?
            .parse::<DbId>()
            .map_err(|_| CoreError::field("instrument", "Must be an instrument id"))?;

        let media_type: MediaType = self
            .media_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::field("media_type", "This field is required"))?
            .parse()?;

        let title = self.title.unwrap_or_default().trim().to_string();
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::field(
                "title",
                format!("Must be at most {MAX_TITLE_LEN} characters"),
            ));
        }

        let (file_name, bytes) = self
            .file
            .ok_or_else(|| CoreError::field("file", "No file was submitted"))?;
        if file_name.trim().is_empty() {
            return Err(CoreError::field("file", "The submitted file has no name"));
        }
        if bytes.is_empty() {
            return Err(CoreError::field("file", "The submitted file is empty"));
        }
        // Checked on the name that will actually be stored.
        let file_name = sanitize_file_name(&file_name);
        validate_media_file(media_type, &file_name)?;

        Ok(ValidUpload {
            instrument_id,
            media_type,
            title,
            is_primary: parse_bool_filter(self.is_primary.as_deref()).unwrap_or(false),
            file_name,
            bytes,
        })
    }
}
