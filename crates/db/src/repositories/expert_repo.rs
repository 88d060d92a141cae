//! Repository for the `experts` table and its `expert_instruments` links.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::filter::{fetch_page, BindValue, ListFilter, ListQuery};
use crate::models::expert::{CreateExpert, Expert, ExpertFilter, UpdateExpert};

/// Column list; linked instrument names are aggregated in a sub-select.
const COLUMNS: &str = "e.id, e.name, e.expertise, e.bio, e.detailed_bio, e.contact_email, \
                       e.photo, e.achievements, e.performance_video, e.teaching_audio, \
                       ARRAY(SELECT i.name::TEXT FROM expert_instruments ei \
                             JOIN instruments i ON i.id = ei.instrument_id \
                             WHERE ei.expert_id = e.id ORDER BY i.name, i.id) AS instrument_names, \
                       e.created_at, e.updated_at";

const SEARCH_FIELDS: &[&str] = &["e.name", "e.expertise"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("name", "e.name"), ("expertise", "e.expertise")],
    default: &[OrderTerm::asc("e.name")],
    tie_breaker: "e.id",
};

/// Provides CRUD operations for experts.
pub struct ExpertRepo;

impl ExpertRepo {
    /// Insert an expert and its instrument links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateExpert) -> Result<Expert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO experts (name, expertise, bio, detailed_bio, contact_email, photo,
                achievements, performance_video, teaching_audio)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, ''), $6,
                COALESCE($7, '{}'::TEXT[]), $8, $9)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.expertise)
        .bind(&input.bio)
        .bind(&input.detailed_bio)
        .bind(&input.contact_email)
        .bind(&input.photo)
        .bind(&input.achievements)
        .bind(&input.performance_video)
        .bind(&input.teaching_audio)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ids) = &input.instrument_ids {
            Self::replace_instruments(&mut tx, id, ids).await?;
        }
        let expert = Self::fetch_one(&mut tx, id).await?;
        tx.commit().await?;

        Ok(expert)
    }

    /// Find an expert by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Expert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM experts e WHERE e.id = $1");
        sqlx::query_as::<_, Expert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List experts with filters, search, ordering and pagination.
    pub async fn list(
        pool: &PgPool,
        params: &ExpertFilter,
        query: &ListQuery,
    ) -> Result<Vec<Expert>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter.search(SEARCH_FIELDS, query.search.as_deref());
        if let Some(instrument_id) = params.instrument {
            filter.push(
                |n| {
                    format!(
                        "EXISTS (SELECT 1 FROM expert_instruments ei \
                         WHERE ei.expert_id = e.id AND ei.instrument_id = ${n})"
                    )
                },
                BindValue::BigInt(instrument_id),
            );
        }
        let base = format!("SELECT {COLUMNS} FROM experts e");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    /// Experts linked to an instrument, alphabetical.
    pub async fn list_for_instrument(
        pool: &PgPool,
        instrument_id: DbId,
    ) -> Result<Vec<Expert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM experts e
             JOIN expert_instruments link ON link.expert_id = e.id
             WHERE link.instrument_id = $1
             ORDER BY e.name, e.id"
        );
        sqlx::query_as::<_, Expert>(&query)
            .bind(instrument_id)
            .fetch_all(pool)
            .await
    }

    /// Update an expert; `instrument_ids`, when present, replaces every link.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExpert,
    ) -> Result<Option<Expert>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE experts SET
                name = COALESCE($2, name),
                expertise = COALESCE($3, expertise),
                bio = COALESCE($4, bio),
                detailed_bio = COALESCE($5, detailed_bio),
                contact_email = COALESCE($6, contact_email),
                photo = COALESCE($7, photo),
                achievements = COALESCE($8, achievements),
                performance_video = COALESCE($9, performance_video),
                teaching_audio = COALESCE($10, teaching_audio)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.expertise)
        .bind(&input.bio)
        .bind(&input.detailed_bio)
        .bind(&input.contact_email)
        .bind(&input.photo)
        .bind(&input.achievements)
        .bind(&input.performance_video)
        .bind(&input.teaching_audio)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        if let Some(ids) = &input.instrument_ids {
            Self::replace_instruments(&mut tx, id, ids).await?;
        }
        let expert = Self::fetch_one(&mut tx, id).await?;
        tx.commit().await?;

        Ok(Some(expert))
    }

    /// Delete an expert by ID. Links cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM experts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace every instrument link of an expert.
    async fn replace_instruments(
        conn: &mut PgConnection,
        expert_id: DbId,
        instrument_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM expert_instruments WHERE expert_id = $1")
            .bind(expert_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            "INSERT INTO expert_instruments (expert_id, instrument_id)
             SELECT $1, ids.id FROM (SELECT DISTINCT UNNEST($2::BIGINT[]) AS id) AS ids",
        )
        .bind(expert_id)
        .bind(instrument_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn fetch_one(conn: &mut PgConnection, id: DbId) -> Result<Expert, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM experts e WHERE e.id = $1");
        sqlx::query_as::<_, Expert>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }
}
