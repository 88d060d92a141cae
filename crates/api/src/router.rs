//! The catalog's HTTP surface.
//!
//! Three trees share one middleware stack: `/health`, the `/api` resources
//! and, when `MEDIA_URL` is a local path, the uploaded files. The binary and
//! the integration tests both build the app through [`build_app_router`].

use std::any::Any;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{check_url_prefix, ServerConfig};
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Assemble routes and middleware.
///
/// Layers run top to bottom for requests: CORS, request id, tracing,
/// request id echo, timeout, then panic recovery closest to the handlers.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(build_cors_layer(config))
        .map_response(|res: axum::http::Response<_>| res.map(Body::new))
        .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::custom(panic_response));

    Router::new()
        .merge(routes::health::router())
        .nest("/api", api(config))
        .merge(media_files(config))
        .layer(middleware)
        .with_state(state)
}

/// Every catalog resource; the body limit also caps multipart uploads.
fn api(config: &ServerConfig) -> Router<AppState> {
    routes::api_routes().layer(DefaultBodyLimit::max(config.media.max_upload_bytes))
}

/// Read-only file serving under the media prefix.
///
/// Empty when files live on another host or the prefix would shadow the
/// API; `MediaConfig::from_env` already refuses the latter at startup.
fn media_files(config: &ServerConfig) -> Router<AppState> {
    let media = &config.media;
    let Some(mount) = media.mount_path() else {
        return Router::new();
    };
    if let Err(reason) = check_url_prefix(&media.url_prefix) {
        tracing::error!(%reason, "Media files are not served");
        return Router::new();
    }
    Router::new().nest_service(&mount, ServeDir::new(&media.root))
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

/// A handler panic becomes the usual JSON 500 body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::InternalError(format!("Handler panicked: {detail}")).into_response()
}

/// CORS for the configured frontend origins.
///
/// # Panics
///
/// On an origin that is not a valid header value; startup should stop there.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn panics_answer_with_the_error_body() {
        let response = panic_response(Box::new("tuner exploded".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(!json["error"].as_str().unwrap().contains("tuner"));
    }

    #[test]
    fn span_carries_the_request_id() {
        let request = Request::builder()
            .uri("/api/instruments/")
            .header(&REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        // Disabled without a subscriber; building it must not panic.
        let _ = request_span(&request);
    }
}
