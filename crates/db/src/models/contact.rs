//! Contact message model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public submission payload. There is deliberately no `is_read` field:
/// read state is server-assigned.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
}

/// Admin-side edit of a stored message.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub subject: Option<String>,
    #[validate(length(min = 1))]
    pub message: Option<String>,
    pub is_read: Option<bool>,
}

/// Full replacement by an admin. `is_read` is optional and keeps its value
/// when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceContact {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub is_read: Option<bool>,
}

impl From<ReplaceContact> for UpdateContact {
    fn from(input: ReplaceContact) -> Self {
        Self {
            name: Some(input.name),
            email: Some(input.email),
            subject: Some(input.subject),
            message: Some(input.message),
            is_read: input.is_read,
        }
    }
}

/// Body of the bulk read-state actions.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactIds {
    #[validate(length(min = 1))]
    pub ids: Vec<DbId>,
}

/// List filters for contact messages.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub is_read: Option<bool>,
}
