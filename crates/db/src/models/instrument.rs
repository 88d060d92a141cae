//! Instrument model and DTOs.
//!
//! Rows are always read joined with their category so the flat shape can
//! show the category name without a second query.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An `instruments` row joined with `categories`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instrument {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub category_name: String,
    pub category_slug: String,
    pub region: String,
    pub description: String,
    pub history: String,
    pub materials: String,
    pub playing_technique: String,
    pub cultural_significance: String,
    /// Stored path of the main image, relative to the media root.
    pub primary_image: Option<String>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Flat write shape for an instrument. `category` is the category name
/// (case-insensitive) or slug.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInstrument {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1, max = 120))]
    pub region: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Image reference; absolute URLs under the media prefix are reduced to
    /// stored paths before persisting.
    pub image: Option<String>,
    pub is_featured: Option<bool>,
    pub history: Option<String>,
    pub materials: Option<String>,
    pub playing_technique: Option<String>,
    pub cultural_significance: Option<String>,
}

/// Partial write shape for an instrument. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInstrument {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub region: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_featured: Option<bool>,
    pub history: Option<String>,
    pub materials: Option<String>,
    pub playing_technique: Option<String>,
    pub cultural_significance: Option<String>,
}

impl From<CreateInstrument> for UpdateInstrument {
    fn from(input: CreateInstrument) -> Self {
        Self {
            name: Some(input.name),
            category: Some(input.category),
            region: Some(input.region),
            description: Some(input.description),
            image: input.image,
            is_featured: input.is_featured,
            history: input.history,
            materials: input.materials,
            playing_technique: input.playing_technique,
            cultural_significance: input.cultural_significance,
        }
    }
}

/// List filters for instruments.
#[derive(Debug, Clone, Default)]
pub struct InstrumentFilter {
    /// Category slug, matched case-insensitively.
    pub category: Option<String>,
    /// Region, matched case-insensitively.
    pub region: Option<String>,
    pub is_featured: Option<bool>,
}
