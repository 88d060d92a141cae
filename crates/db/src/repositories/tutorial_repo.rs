//! Repository for the `tutorials` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::tutorial::{CreateTutorial, Tutorial, TutorialFilter, UpdateTutorial};

const COLUMNS: &str = "id, instrument_id, title, description, video_url, instructor_name, \
                       duration, created_at, updated_at";

const SEARCH_FIELDS: &[&str] = &["title", "description", "instructor_name"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("created_at", "created_at"), ("title", "title")],
    default: &[OrderTerm::desc("created_at")],
    tie_breaker: "id",
};

/// Provides CRUD operations for tutorials.
pub struct TutorialRepo;

impl TutorialRepo {
    pub async fn create(pool: &PgPool, input: &CreateTutorial) -> Result<Tutorial, sqlx::Error> {
        let query = format!(
            "INSERT INTO tutorials (instrument_id, title, description, video_url,
                instructor_name, duration)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tutorial>(&query)
            .bind(input.instrument)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.video_url)
            .bind(&input.instructor_name)
            .bind(&input.duration)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tutorial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tutorials WHERE id = $1");
        sqlx::query_as::<_, Tutorial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &TutorialFilter,
        query: &ListQuery,
    ) -> Result<Vec<Tutorial>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_id("instrument_id", params.instrument);
        let base = format!("SELECT {COLUMNS} FROM tutorials");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    /// Every tutorial of one instrument, newest first.
    pub async fn list_for_instrument(
        pool: &PgPool,
        instrument_id: DbId,
    ) -> Result<Vec<Tutorial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tutorials
             WHERE instrument_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Tutorial>(&query)
            .bind(instrument_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTutorial,
    ) -> Result<Option<Tutorial>, sqlx::Error> {
        let query = format!(
            "UPDATE tutorials SET
                instrument_id = COALESCE($2, instrument_id),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                video_url = COALESCE($5, video_url),
                instructor_name = COALESCE($6, instructor_name),
                duration = COALESCE($7, duration)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tutorial>(&query)
            .bind(id)
            .bind(input.instrument)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.video_url)
            .bind(&input.instructor_name)
            .bind(&input.duration)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tutorials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
