//! Expert model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateEmail, ValidationError};

/// An `experts` row plus the names of its linked instruments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expert {
    pub id: DbId,
    pub name: String,
    pub expertise: String,
    pub bio: String,
    pub detailed_bio: String,
    pub contact_email: String,
    pub photo: Option<String>,
    pub achievements: Vec<String>,
    pub performance_video: Option<String>,
    pub teaching_audio: Option<String>,
    /// Linked instrument names, alphabetical.
    pub instrument_names: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an expert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExpert {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 150))]
    pub expertise: String,
    #[validate(length(min = 1))]
    pub bio: String,
    pub photo: Option<String>,
    pub detailed_bio: Option<String>,
    #[validate(custom(function = "validate_contact_email"))]
    pub contact_email: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub performance_video: Option<String>,
    pub teaching_audio: Option<String>,
    /// Replaces the expert's instrument links when present.
    pub instrument_ids: Option<Vec<DbId>>,
}

/// DTO for updating an expert. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateExpert {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub expertise: Option<String>,
    #[validate(length(min = 1))]
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub detailed_bio: Option<String>,
    #[validate(custom(function = "validate_contact_email"))]
    pub contact_email: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub performance_video: Option<String>,
    pub teaching_audio: Option<String>,
    pub instrument_ids: Option<Vec<DbId>>,
}

impl From<CreateExpert> for UpdateExpert {
    fn from(input: CreateExpert) -> Self {
        Self {
            name: Some(input.name),
            expertise: Some(input.expertise),
            bio: Some(input.bio),
            photo: input.photo,
            detailed_bio: input.detailed_bio,
            contact_email: input.contact_email,
            achievements: input.achievements,
            performance_video: input.performance_video,
            teaching_audio: input.teaching_audio,
            instrument_ids: input.instrument_ids,
        }
    }
}

/// An expert's contact email may be left blank.
fn validate_contact_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

/// List filters for experts.
#[derive(Debug, Clone, Default)]
pub struct ExpertFilter {
    /// Only experts linked to this instrument.
    pub instrument: Option<DbId>,
}
