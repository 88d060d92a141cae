//! Repository for the `instruments` table.
//!
//! Every read joins `categories` so rows carry the category name and slug.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::instrument::{CreateInstrument, Instrument, InstrumentFilter, UpdateInstrument};

/// Joined column list; `i` is the instrument row, `c` its category.
const COLUMNS: &str = "i.id, i.name, i.category_id, c.name AS category_name, \
                       c.slug AS category_slug, i.region, i.description, i.history, \
                       i.materials, i.playing_technique, i.cultural_significance, \
                       i.primary_image, i.is_featured, i.created_at, i.updated_at";

const SEARCH_FIELDS: &[&str] = &[
    "i.name",
    "i.description",
    "i.history",
    "i.materials",
    "i.cultural_significance",
];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[
        ("name", "i.name"),
        ("region", "i.region"),
        ("created_at", "i.created_at"),
    ],
    default: &[OrderTerm::asc("i.name")],
    tie_breaker: "i.id",
};

/// Provides CRUD operations for instruments.
pub struct InstrumentRepo;

impl InstrumentRepo {
    /// Insert a new instrument under a resolved category.
    pub async fn create(
        pool: &PgPool,
        category_id: DbId,
        input: &CreateInstrument,
    ) -> Result<Instrument, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                INSERT INTO instruments (name, category_id, region, description, history,
                    materials, playing_technique, cultural_significance, primary_image, is_featured)
                VALUES ($1, $2, $3, $4, COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''),
                    COALESCE($8, ''), $9, COALESCE($10, false))
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN categories c ON c.id = i.category_id"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(&input.name)
            .bind(category_id)
            .bind(&input.region)
            .bind(&input.description)
            .bind(&input.history)
            .bind(&input.materials)
            .bind(&input.playing_technique)
            .bind(&input.cultural_significance)
            .bind(&input.image)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Find an instrument by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Instrument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM instruments i JOIN categories c ON c.id = i.category_id
             WHERE i.id = $1"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if an instrument with `id` exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM instruments WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Ids from `ids` that do not name an existing instrument.
    pub async fn missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT wanted.id FROM UNNEST($1::BIGINT[]) AS wanted(id)
             WHERE NOT EXISTS (SELECT 1 FROM instruments i WHERE i.id = wanted.id)
             ORDER BY wanted.id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// List instruments with filters, search, ordering and pagination.
    pub async fn list(
        pool: &PgPool,
        params: &InstrumentFilter,
        query: &ListQuery,
    ) -> Result<Vec<Instrument>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_text_ci("c.slug", params.category.as_deref())
            .eq_text_ci("i.region", params.region.as_deref())
            .eq_bool("i.is_featured", params.is_featured);
        let base =
            format!("SELECT {COLUMNS} FROM instruments i JOIN categories c ON c.id = i.category_id");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    /// Instruments linked to an expert, alphabetical.
    pub async fn list_for_expert(
        pool: &PgPool,
        expert_id: DbId,
    ) -> Result<Vec<Instrument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM instruments i
             JOIN categories c ON c.id = i.category_id
             JOIN expert_instruments ei ON ei.instrument_id = i.id
             WHERE ei.expert_id = $1
             ORDER BY i.name, i.id"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(expert_id)
            .fetch_all(pool)
            .await
    }

    /// Update an instrument. Only non-`None` fields are applied; `category_id`
    /// is the already-resolved category when the payload named one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        category_id: Option<DbId>,
        input: &UpdateInstrument,
    ) -> Result<Option<Instrument>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE instruments SET
                    name = COALESCE($2, name),
                    category_id = COALESCE($3, category_id),
                    region = COALESCE($4, region),
                    description = COALESCE($5, description),
                    history = COALESCE($6, history),
                    materials = COALESCE($7, materials),
                    playing_technique = COALESCE($8, playing_technique),
                    cultural_significance = COALESCE($9, cultural_significance),
                    primary_image = COALESCE($10, primary_image),
                    is_featured = COALESCE($11, is_featured)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN categories c ON c.id = i.category_id"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(category_id)
            .bind(&input.region)
            .bind(&input.description)
            .bind(&input.history)
            .bind(&input.materials)
            .bind(&input.playing_technique)
            .bind(&input.cultural_significance)
            .bind(&input.image)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Delete an instrument by ID. Media, tutorials, tuner configuration and
    /// expert links cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM instruments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
