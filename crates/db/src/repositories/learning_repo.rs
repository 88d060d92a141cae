//! Repository for the `learning_content` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::learning::{
    CreateLearningContent, LearningContent, LearningFilter, UpdateLearningContent,
};

const COLUMNS: &str = "id, title, content, sort_order, is_published, created_at, updated_at";

const SEARCH_FIELDS: &[&str] = &["title", "content"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("order", "sort_order"), ("title", "title")],
    default: &[OrderTerm::asc("sort_order"), OrderTerm::asc("title")],
    tie_breaker: "id",
};

/// Provides CRUD operations for learning content.
pub struct LearningRepo;

impl LearningRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateLearningContent,
    ) -> Result<LearningContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO learning_content (title, content, sort_order, is_published)
             VALUES ($1, $2, $3, COALESCE($4, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningContent>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.order)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LearningContent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM learning_content WHERE id = $1");
        sqlx::query_as::<_, LearningContent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List learning content, by default in learning-path order.
    pub async fn list(
        pool: &PgPool,
        params: &LearningFilter,
        query: &ListQuery,
    ) -> Result<Vec<LearningContent>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_bool("is_published", params.is_published);
        let base = format!("SELECT {COLUMNS} FROM learning_content");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLearningContent,
    ) -> Result<Option<LearningContent>, sqlx::Error> {
        let query = format!(
            "UPDATE learning_content SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                sort_order = COALESCE($4, sort_order),
                is_published = COALESCE($5, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LearningContent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.order)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM learning_content WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
