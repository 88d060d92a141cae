//! Tuner configuration model and DTOs.

use baja_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tuner_configurations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TunerConfiguration {
    pub id: DbId,
    pub instrument_id: DbId,
    pub tuning_name: String,
    pub notes: Vec<String>,
    pub frequencies: Vec<f64>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTunerConfiguration {
    pub instrument: DbId,
    #[validate(length(min = 1, max = 100))]
    pub tuning_name: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub frequencies: Vec<f64>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTunerConfiguration {
    pub instrument: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub tuning_name: Option<String>,
    pub notes: Option<Vec<String>>,
    pub frequencies: Option<Vec<f64>>,
    pub is_default: Option<bool>,
}

impl From<CreateTunerConfiguration> for UpdateTunerConfiguration {
    fn from(input: CreateTunerConfiguration) -> Self {
        Self {
            instrument: Some(input.instrument),
            tuning_name: input.tuning_name,
            notes: Some(input.notes),
            frequencies: Some(input.frequencies),
            is_default: input.is_default,
        }
    }
}

/// List filters for tuner configurations.
#[derive(Debug, Clone, Default)]
pub struct TunerFilter {
    pub instrument: Option<DbId>,
    pub is_default: Option<bool>,
}
