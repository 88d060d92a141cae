//! Learning content model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `learning_content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearningContent {
    pub id: DbId,
    pub title: String,
    pub content: String,
    /// Position in the learning path (column `sort_order`).
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLearningContent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub order: i32,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLearningContent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(range(min = 0))]
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

impl From<CreateLearningContent> for UpdateLearningContent {
    fn from(input: CreateLearningContent) -> Self {
        Self {
            title: Some(input.title),
            content: Some(input.content),
            order: Some(input.order),
            is_published: input.is_published,
        }
    }
}

/// List filters for learning content.
#[derive(Debug, Clone, Default)]
pub struct LearningFilter {
    pub is_published: Option<bool>,
}
