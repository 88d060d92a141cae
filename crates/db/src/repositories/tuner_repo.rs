//! Repository for the `tuner_configurations` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::tuner::DEFAULT_TUNING_NAME;
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::tuner::{
    CreateTunerConfiguration, TunerConfiguration, TunerFilter, UpdateTunerConfiguration,
};

const COLUMNS: &str = "id, instrument_id, tuning_name, notes, frequencies, is_default, \
                       created_at, updated_at";

const SEARCH_FIELDS: &[&str] = &["tuning_name"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("is_default", "is_default"), ("tuning_name", "tuning_name")],
    default: &[OrderTerm::desc("is_default"), OrderTerm::asc("tuning_name")],
    tie_breaker: "id",
};

/// Provides CRUD operations for tuner configurations.
pub struct TunerRepo;

impl TunerRepo {
    /// Insert a configuration. A second one for the same instrument violates
    /// `uq_tuner_configurations_instrument`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTunerConfiguration,
    ) -> Result<TunerConfiguration, sqlx::Error> {
        let query = format!(
            "INSERT INTO tuner_configurations (instrument_id, tuning_name, notes, frequencies, is_default)
             VALUES ($1, COALESCE($2, $3), $4, $5, COALESCE($6, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TunerConfiguration>(&query)
            .bind(input.instrument)
            .bind(&input.tuning_name)
            .bind(DEFAULT_TUNING_NAME)
            .bind(&input.notes)
            .bind(&input.frequencies)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TunerConfiguration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tuner_configurations WHERE id = $1");
        sqlx::query_as::<_, TunerConfiguration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The configuration attached to an instrument, if any.
    pub async fn find_for_instrument(
        pool: &PgPool,
        instrument_id: DbId,
    ) -> Result<Option<TunerConfiguration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tuner_configurations WHERE instrument_id = $1");
        sqlx::query_as::<_, TunerConfiguration>(&query)
            .bind(instrument_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &TunerFilter,
        query: &ListQuery,
    ) -> Result<Vec<TunerConfiguration>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_id("instrument_id", params.instrument)
            .eq_bool("is_default", params.is_default);
        let base = format!("SELECT {COLUMNS} FROM tuner_configurations");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTunerConfiguration,
    ) -> Result<Option<TunerConfiguration>, sqlx::Error> {
        let query = format!(
            "UPDATE tuner_configurations SET
                instrument_id = COALESCE($2, instrument_id),
                tuning_name = COALESCE($3, tuning_name),
                notes = COALESCE($4, notes),
                frequencies = COALESCE($5, frequencies),
                is_default = COALESCE($6, is_default)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TunerConfiguration>(&query)
            .bind(id)
            .bind(input.instrument)
            .bind(&input.tuning_name)
            .bind(&input.notes)
            .bind(&input.frequencies)
            .bind(input.is_default)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tuner_configurations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
