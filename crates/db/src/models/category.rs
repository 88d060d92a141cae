//! Category model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category. `slug` is derived from `name` when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 140))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// DTO for updating a category. Renaming never touches the slug.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 140))]
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl From<CreateCategory> for UpdateCategory {
    fn from(input: CreateCategory) -> Self {
        Self {
            name: Some(input.name),
            slug: input.slug,
            description: Some(input.description),
        }
    }
}
