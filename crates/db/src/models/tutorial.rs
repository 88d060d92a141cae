//! Tutorial model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tutorials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tutorial {
    pub id: DbId,
    pub instrument_id: DbId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub instructor_name: String,
    /// Free-text running time, e.g. `"12:30"`.
    pub duration: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTutorial {
    pub instrument: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(url)]
    pub video_url: String,
    #[validate(length(min = 1, max = 150))]
    pub instructor_name: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTutorial {
    pub instrument: Option<DbId>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub instructor_name: Option<String>,
    #[validate(length(max = 50))]
    pub duration: Option<String>,
}

impl From<CreateTutorial> for UpdateTutorial {
    fn from(input: CreateTutorial) -> Self {
        Self {
            instrument: Some(input.instrument),
            title: Some(input.title),
            description: Some(input.description),
            video_url: Some(input.video_url),
            instructor_name: Some(input.instructor_name),
            duration: Some(input.duration),
        }
    }
}

/// List filters for tutorials.
#[derive(Debug, Clone, Default)]
pub struct TutorialFilter {
    pub instrument: Option<DbId>,
}
