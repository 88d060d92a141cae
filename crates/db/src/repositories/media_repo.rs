//! Repository for the `media` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::media::{Media, MediaFilter, UpdateMedia};

/// Column list shared across queries; every query aliases `media` as `m`.
const COLUMNS: &str = "m.id, m.instrument_id, m.media_type, m.file, m.title, m.is_primary, \
                       m.uploaded_at, m.created_at, m.updated_at";

const SEARCH_FIELDS: &[&str] = &["m.title", "i.name"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[
        ("id", "m.id"),
        ("media_type", "m.media_type"),
        ("uploaded_at", "m.uploaded_at"),
    ],
    default: &[OrderTerm::asc("m.media_type")],
    tie_breaker: "m.id",
};

/// Validated values for a new media row.
#[derive(Debug, Clone)]
pub struct NewMedia<'a> {
    pub instrument_id: DbId,
    pub media_type: &'a str,
    /// Stored path relative to the media root.
    pub file: &'a str,
    pub title: &'a str,
    pub is_primary: bool,
}

/// Provides CRUD operations for media assets.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a new media row, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewMedia<'_>) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media AS m (instrument_id, media_type, file, title, is_primary)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(input.instrument_id)
            .bind(input.media_type)
            .bind(input.file)
            .bind(input.title)
            .bind(input.is_primary)
            .fetch_one(pool)
            .await
    }

    /// Find a media row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media m WHERE m.id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List media with filters, search, ordering and pagination.
    pub async fn list(
        pool: &PgPool,
        params: &MediaFilter,
        query: &ListQuery,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_id("m.instrument_id", params.instrument)
            .eq_text("m.media_type", params.media_type.as_deref())
            .eq_bool("m.is_primary", params.is_primary);
        let base = format!("SELECT {COLUMNS} FROM media m JOIN instruments i ON i.id = m.instrument_id");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    /// All media of one instrument in `(media_type, id)` order.
    pub async fn list_for_instrument(
        pool: &PgPool,
        instrument_id: DbId,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media m
             WHERE m.instrument_id = $1
             ORDER BY m.media_type, m.id"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(instrument_id)
            .fetch_all(pool)
            .await
    }

    /// Update a media row. Only non-`None` fields in `input` are applied;
    /// `input.file` must already be a stored path.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMedia,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media AS m SET
                instrument_id = COALESCE($2, instrument_id),
                media_type = COALESCE($3, media_type),
                file = COALESCE($4, file),
                title = COALESCE($5, title),
                is_primary = COALESCE($6, is_primary)
             WHERE m.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(input.instrument)
            .bind(&input.media_type)
            .bind(&input.file)
            .bind(&input.title)
            .bind(input.is_primary)
            .fetch_optional(pool)
            .await
    }

    /// Delete a media row by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
