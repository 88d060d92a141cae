//! Media model and DTOs.

use baja_core::media::{MediaCandidate, MediaType};
use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub instrument_id: DbId,
    /// One of `image`, `audio`, `model_3d`, `video` (enforced by `chk_media_type`).
    pub media_type: String,
    /// Stored path relative to the media root.
    pub file: String,
    pub title: String,
    pub is_primary: bool,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaCandidate for Media {
    fn candidate_id(&self) -> DbId {
        self.id
    }

    fn candidate_type(&self) -> Option<MediaType> {
        self.media_type.parse().ok()
    }

    fn candidate_is_primary(&self) -> bool {
        self.is_primary
    }
}

/// DTO for creating a media row that points at an already-stored file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMedia {
    pub instrument: DbId,
    pub media_type: String,
    #[validate(length(min = 1))]
    pub file: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// DTO for updating a media row. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMedia {
    pub instrument: Option<DbId>,
    pub media_type: Option<String>,
    #[validate(length(min = 1))]
    pub file: Option<String>,
    #[validate(length(max = 150))]
    pub title: Option<String>,
    pub is_primary: Option<bool>,
}

impl From<CreateMedia> for UpdateMedia {
    fn from(input: CreateMedia) -> Self {
        Self {
            instrument: Some(input.instrument),
            media_type: Some(input.media_type),
            file: Some(input.file),
            title: Some(input.title),
            is_primary: Some(input.is_primary),
        }
    }
}

/// List filters for media.
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub instrument: Option<DbId>,
    pub media_type: Option<String>,
    pub is_primary: Option<bool>,
}
