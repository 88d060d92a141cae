//! List-query helpers: ordering allow-lists, search patterns, pagination.
//!
//! This module lives in `core` (zero internal deps) so the repository layer
//! can build SQL fragments from already-validated pieces only. Nothing a
//! client sends is ever spliced into SQL; ordering is resolved against a
//! static allow-list and search terms are always bound parameters.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// One `ORDER BY` term resolved from the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm {
    /// Fully qualified SQL column, taken from the allow-list, never from input.
    pub column: &'static str,
    pub descending: bool,
}

impl OrderTerm {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Per-resource ordering rules.
#[derive(Debug, Clone, Copy)]
pub struct OrderingSpec {
    /// `(public field name, SQL column)` pairs clients may order by.
    pub allowed: &'static [(&'static str, &'static str)],
    /// Ordering applied when the client asks for nothing usable.
    pub default: &'static [OrderTerm],
    /// Column appended last so paging is deterministic.
    pub tie_breaker: &'static str,
}

impl OrderingSpec {
    /// Resolve a raw `ordering` parameter (`"name,-created_at"`).
    ///
    /// Unknown field names are dropped silently. When nothing valid remains
    /// the default ordering is returned.
    pub fn resolve(&self, raw: Option<&str>) -> Vec<OrderTerm> {
        let requested: Vec<OrderTerm> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .filter_map(|field| {
                let (name, descending) = match field.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (field, false),
                };
                self.allowed
                    .iter()
                    .find(|(public, _)| *public == name)
                    .map(|&(_, column)| OrderTerm { column, descending })
            })
            .collect();

        if requested.is_empty() {
            self.default.to_vec()
        } else {
            requested
        }
    }

    /// Render the `ORDER BY` body (without the keyword) for a raw parameter.
    pub fn order_by_clause(&self, raw: Option<&str>) -> String {
        let mut parts: Vec<String> = self
            .resolve(raw)
            .iter()
            .map(|t| {
                format!(
                    "{} {}",
                    t.column,
                    if t.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        parts.push(format!("{} ASC", self.tie_breaker));
        parts.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Search and filters
// ---------------------------------------------------------------------------

/// Turn a free-text search term into an `ILIKE` substring pattern.
///
/// LIKE metacharacters in the input are escaped (with `\`, PostgreSQL's
/// default escape character) so they match literally. Returns `None` for
/// blank input so callers can skip the clause entirely.
pub fn like_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

/// Parse a boolean query filter.
///
/// Unrecognized values yield `None`, which means "no filter" rather than an
/// error.
pub fn parse_bool_filter(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse an id filter; malformed values are ignored.
pub fn parse_id_filter(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Treat blank string filters as absent.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: OrderingSpec = OrderingSpec {
        allowed: &[("name", "i.name"), ("region", "i.region"), ("created_at", "i.created_at")],
        default: &[OrderTerm::asc("i.name")],
        tie_breaker: "i.id",
    };

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(200), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(-5), 20, 100), 1);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn ordering_defaults_when_absent() {
        assert_eq!(SPEC.resolve(None), vec![OrderTerm::asc("i.name")]);
    }

    #[test]
    fn ordering_minus_prefix_is_descending() {
        assert_eq!(SPEC.resolve(Some("-region")), vec![OrderTerm::desc("i.region")]);
    }

    #[test]
    fn ordering_ignores_unknown_fields() {
        assert_eq!(
            SPEC.resolve(Some("password,-created_at")),
            vec![OrderTerm::desc("i.created_at")]
        );
        assert_eq!(SPEC.resolve(Some("id; DROP TABLE x")), SPEC.default.to_vec());
    }

    #[test]
    fn ordering_clause_appends_tie_breaker() {
        assert_eq!(
            SPEC.order_by_clause(Some("region,-name")),
            "i.region ASC, i.name DESC, i.id ASC"
        );
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("sa_rangi"), Some("%sa\\_rangi%".to_string()));
        assert_eq!(like_pattern("100%"), Some("%100\\%%".to_string()));
        assert_eq!(like_pattern("   "), None);
    }

    #[test]
    fn bool_filter_accepts_common_spellings() {
        assert_eq!(parse_bool_filter(Some("True")), Some(true));
        assert_eq!(parse_bool_filter(Some("0")), Some(false));
        assert_eq!(parse_bool_filter(Some("maybe")), None);
        assert_eq!(parse_bool_filter(None), None);
    }

    #[test]
    fn id_filter_ignores_garbage() {
        assert_eq!(parse_id_filter(Some("12")), Some(12));
        assert_eq!(parse_id_filter(Some("twelve")), None);
    }
}
