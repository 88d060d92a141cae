//! Request extractors shared by the resource handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON is a 400 `BAD_REQUEST`; rule violations are a 400
/// `VALIDATION_ERROR` with per-field messages.
///
/// Write handlers take `Result<ValidatedJson<T>, AppError>` and unwrap it
/// only after the access check, so an anonymous caller sees 401 whatever the
/// body looks like.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(e.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Scheme and host the client used, for building absolute file URLs.
///
/// Taken from the `Host` header with the scheme from `X-Forwarded-Proto`
/// (default `http`). Absent when the request carries no `Host` or the host
/// is not in `ALLOWED_HOSTS`; file URLs are then relative.
#[derive(Debug, Clone, Default)]
pub struct RequestOrigin(pub Option<String>);

impl RequestOrigin {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Resolve the origin from request headers against an allow-list.
    pub fn from_headers(headers: &HeaderMap, allowed_hosts: &[String]) -> Self {
        let host = headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty());

        let Some(host) = host else {
            return RequestOrigin(None);
        };

        if !host_is_allowed(host, allowed_hosts) {
            tracing::debug!(host, "Host not allowed, using relative file URLs");
            return RequestOrigin(None);
        }

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| matches!(*s, "http" | "https"))
            .unwrap_or("http");

        RequestOrigin(Some(format!("{scheme}://{host}")))
    }
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(
            &parts.headers,
            &state.config.allowed_hosts,
        ))
    }
}

/// Match a `Host` value (port ignored, case-insensitive) against the
/// configured patterns: an exact name, `.example.org` for the domain and
/// all of its subdomains, or `*` for anything.
fn host_is_allowed(host: &str, allowed: &[String]) -> bool {
    let name = strip_port(host).to_ascii_lowercase();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '[' | ']' | ':'))
    {
        return false;
    }

    allowed.iter().any(|pattern| {
        let pattern = pattern.trim().to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            name == domain || name.ends_with(&pattern)
        } else {
            name == pattern
        }
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal, e.g. `[::1]:3000`.
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn allowed() -> Vec<String> {
        vec!["api.example.org".into(), ".baja.test".into(), "[::1]".into()]
    }

    fn origin_of(host: Option<&str>, proto: Option<&str>) -> Option<String> {
        let mut headers = HeaderMap::new();
        if let Some(host) = host {
            headers.insert(HOST, HeaderValue::from_str(host).unwrap());
        }
        if let Some(proto) = proto {
            headers.insert("x-forwarded-proto", HeaderValue::from_str(proto).unwrap());
        }
        RequestOrigin::from_headers(&headers, &allowed()).0
    }

    #[test]
    fn origin_defaults_to_http() {
        assert_eq!(
            origin_of(Some("api.example.org"), None).as_deref(),
            Some("http://api.example.org")
        );
    }

    #[test]
    fn origin_honours_forwarded_proto() {
        assert_eq!(
            origin_of(Some("api.example.org:8443"), Some("https, http")).as_deref(),
            Some("https://api.example.org:8443")
        );
        assert_eq!(
            origin_of(Some("api.example.org"), Some("gopher")).as_deref(),
            Some("http://api.example.org")
        );
    }

    #[test]
    fn no_host_means_relative_urls() {
        assert_eq!(origin_of(None, None), None);
    }

    #[test]
    fn unknown_host_means_relative_urls() {
        assert_eq!(origin_of(Some("evil.test"), Some("https")), None);
        assert_eq!(origin_of(Some("api.example.org.evil.test"), None), None);
        assert_eq!(origin_of(Some("evil.test/api.example.org"), None), None);
    }

    #[test]
    fn host_patterns() {
        let allowed = allowed();
        assert!(host_is_allowed("API.Example.org", &allowed));
        assert!(host_is_allowed("baja.test", &allowed));
        assert!(host_is_allowed("media.baja.test:3000", &allowed));
        assert!(host_is_allowed("[::1]:3000", &allowed));
        assert!(!host_is_allowed("notbaja.test", &allowed));
        assert!(!host_is_allowed("example.org", &allowed));
        assert!(host_is_allowed("anything.local", &["*".to_string()]));
        assert!(!host_is_allowed("api.example.org", &[]));
    }
}
