//! Repository for the `contacts` table.

use baja_core::query::{OrderTerm, OrderingSpec};
use baja_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{fetch_page, ListFilter, ListQuery};
use crate::models::contact::{Contact, ContactFilter, CreateContact, UpdateContact};

const COLUMNS: &str = "id, name, email, subject, message, is_read, created_at, updated_at";

const SEARCH_FIELDS: &[&str] = &["name", "email", "subject", "message"];

pub const ORDERING: OrderingSpec = OrderingSpec {
    allowed: &[("created_at", "created_at"), ("name", "name")],
    default: &[OrderTerm::desc("created_at")],
    tie_breaker: "id",
};

/// Provides CRUD and read-state operations for contact messages.
pub struct ContactRepo;

impl ContactRepo {
    /// Store a visitor message. `is_read` always starts `false`.
    pub async fn create(pool: &PgPool, input: &CreateContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, email, subject, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List messages, newest first unless another ordering is requested.
    pub async fn list(
        pool: &PgPool,
        params: &ContactFilter,
        query: &ListQuery,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let mut filter = ListFilter::new();
        filter
            .search(SEARCH_FIELDS, query.search.as_deref())
            .eq_bool("is_read", params.is_read);
        let base = format!("SELECT {COLUMNS} FROM contacts");
        fetch_page(pool, &base, &filter, &ORDERING, query).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                subject = COALESCE($4, subject),
                message = COALESCE($5, message),
                is_read = COALESCE($6, is_read)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(input.is_read)
            .fetch_optional(pool)
            .await
    }

    /// Set `is_read` on every listed message. Returns the number of rows matched.
    pub async fn set_read(pool: &PgPool, ids: &[DbId], is_read: bool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contacts SET is_read = $2 WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(is_read)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
