//! Repository for the `categories` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Search fields for `?search=`.
const SEARCH_FIELDS: &[&str] = &["name", "description"];

/// Ordering allow-list and default for category lists.
pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("name", "name"), ("created_at", "created_at")],
    default: &[OrderTerm::asc("name")],
    tie_breaker: "id",
};

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category with an already-resolved slug.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a category reference from a write payload.
    ///
    /// Matches the name case-insensitively first, then the slug.
    pub async fn find_by_name_or_slug(
        pool: &PgPool,
        value: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE LOWER(name) = LOWER($1) OR LOWER(slug) = LOWER($1)
             ORDER BY (LOWER(name) = LOWER($1)) DESC, id
             LIMIT 1"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(value.trim())
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if any category already uses `slug`.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// First free slug among `base`, `base-2`, `base-3`, ...
    pub async fn next_available_slug(pool: &PgPool, base: &str) -> Result<String, sqlx::Error> {
        if !Self::slug_exists(pool, base).await? {
            return Ok(base.to_string());
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !Self::slug_exists(pool, &candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// List categories with search, ordering and pagination.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Vec<Category>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter.search(SEARCH_FIELDS, query.search.as_deref());
        let base = format!("SELECT {COLUMNS} FROM categories");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Number of instruments filed under a category.
    pub async fn count_instruments(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM instruments WHERE category_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Delete a category by ID. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while instruments still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
