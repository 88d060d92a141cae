//! Dynamic `WHERE` / `ORDER BY` / `LIMIT` assembly for list endpoints.
//!
//! Conditions are accumulated with numbered placeholders and their values are
//! kept alongside as typed [`BindValue`]s, so a repository can describe its
//! filters declaratively and hand the result to [`fetch_page`].

use baja_core::query::{clamp_limit, clamp_offset, like_pattern, OrderingSpec};
use baja_core::query::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

/// Generic list parameters shared by every collection endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Free-text search term.
    pub search: Option<String>,
    /// Raw `ordering` parameter, e.g. `"name,-created_at"`.
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Typed bind value for dynamically-built list queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Text(String),
    Bool(bool),
}

/// Accumulates `WHERE` conditions and their bind values.
#[derive(Debug, Default)]
pub struct ListFilter {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder index the next pushed value will occupy.
    pub fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    /// Push a condition whose single placeholder is produced by `build`.
    pub fn push(&mut self, build: impl FnOnce(usize) -> String, value: BindValue) -> &mut Self {
        let condition = build(self.next_index());
        self.conditions.push(condition);
        self.values.push(value);
        self
    }

    /// `column = $n` for an optional id.
    pub fn eq_id(&mut self, column: &str, value: Option<i64>) -> &mut Self {
        if let Some(v) = value {
            self.push(|n| format!("{column} = ${n}"), BindValue::BigInt(v));
        }
        self
    }

    /// `column = $n` for an optional boolean.
    pub fn eq_bool(&mut self, column: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.push(|n| format!("{column} = ${n}"), BindValue::Bool(v));
        }
        self
    }

    /// Exact match on text.
    pub fn eq_text(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(|n| format!("{column} = ${n}"), BindValue::Text(v.to_string()));
        }
        self
    }

    /// Case-insensitive exact match on text.
    pub fn eq_text_ci(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.push(
                |n| format!("LOWER({column}) = LOWER(${n})"),
                BindValue::Text(v.to_string()),
            );
        }
        self
    }

    /// Substring search OR-combined across `columns`, sharing one placeholder.
    pub fn search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        if let Some(pattern) = term.and_then(like_pattern) {
            self.push(
                |n| {
                    let parts: Vec<String> =
                        columns.iter().map(|c| format!("{c} ILIKE ${n}")).collect();
                    format!("({})", parts.join(" OR "))
                },
                BindValue::Text(pattern),
            );
        }
        self
    }

    /// Rendered `WHERE ...` clause, or an empty string when no filter is active.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn values(&self) -> &[BindValue] {
        &self.values
    }

    /// Bind every accumulated value, in placeholder order.
    pub fn bind_to<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in &self.values {
            q = match value {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
            };
        }
        q
    }
}

/// Run `base` (a `SELECT ... FROM ...` without `WHERE`) with the filter,
/// the resolved ordering, and the page window applied.
pub async fn fetch_page<O>(
    pool: &PgPool,
    base: &str,
    filter: &ListFilter,
    ordering: &OrderingSpec,
    query: &ListQuery,
) -> Result<Vec<O>, sqlx::Error>
where
    O: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let limit_idx = filter.next_index();
    let sql = format!(
        "{base} {where_clause} ORDER BY {order_by} LIMIT ${limit_idx} OFFSET ${offset_idx}",
        where_clause = filter.where_clause(),
        order_by = ordering.order_by_clause(query.ordering.as_deref()),
        offset_idx = limit_idx + 1,
    );
    tracing::debug!(sql = %sql, "List query");

    filter
        .bind_to(sqlx::query_as::<_, O>(&sql))
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_nothing() {
        let f = ListFilter::new();
        assert_eq!(f.where_clause(), "");
        assert_eq!(f.next_index(), 1);
    }

    #[test]
    fn absent_values_add_no_conditions() {
        let mut f = ListFilter::new();
        f.eq_id("m.instrument_id", None)
            .eq_bool("m.is_primary", None)
            .search(&["m.title"], Some("   "));
        assert_eq!(f.where_clause(), "");
    }

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut f = ListFilter::new();
        f.search(&["i.name", "i.description"], Some("drum"))
            .eq_text_ci("c.slug", Some("Percussion"))
            .eq_bool("i.is_featured", Some(true));
        assert_eq!(
            f.where_clause(),
            "WHERE (i.name ILIKE $1 OR i.description ILIKE $1) \
             AND LOWER(c.slug) = LOWER($2) AND i.is_featured = $3"
        );
        assert_eq!(
            f.values(),
            &[
                BindValue::Text("%drum%".into()),
                BindValue::Text("Percussion".into()),
                BindValue::Bool(true),
            ]
        );
        assert_eq!(f.next_index(), 4);
    }

    #[test]
    fn list_query_clamps_window() {
        let q = ListQuery {
            limit: Some(10_000),
            offset: Some(-4),
            ..Default::default()
        };
        assert_eq!(q.limit(), MAX_LIST_LIMIT);
        assert_eq!(q.offset(), 0);
        assert_eq!(ListQuery::default().limit(), DEFAULT_LIST_LIMIT);
    }
}
