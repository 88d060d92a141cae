#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use baja_api::auth::jwt::JwtConfig;
use baja_api::auth::password::hash_password;
use baja_api::config::{MediaConfig, ServerConfig};
use baja_api::router::build_app_router;
use baja_api::state::AppState;
use baja_core::roles::{ROLE_ADMIN, ROLE_USER};
use baja_db::models::user::{CreateUser, User};
use baja_db::repositories::UserRepo;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Each call gets its own media root under the system temp directory so
/// upload tests never see each other's files.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        allowed_hosts: vec!["catalog.test".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-entropy".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        media: MediaConfig {
            root: test_media_root(),
            url_prefix: "/media/".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        },
    }
}

fn test_media_root() -> PathBuf {
    std::env::temp_dir().join(format!("baja-media-{}", uuid::Uuid::new_v4().simple()))
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Log in through the API and return the `data` object (`access`, `refresh`, ...).
pub async fn login(app: Router, username: &str) -> Value {
    let response = post_json(
        app,
        "/api/auth/token/",
        json!({ "username": username, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Create an admin and return an access token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    token_for(pool, "catalog_admin", ROLE_ADMIN).await
}

/// Create a non-privileged user and return an access token for it.
pub async fn user_token(pool: &PgPool) -> String {
    token_for(pool, "catalog_reader", ROLE_USER).await
}

async fn token_for(pool: &PgPool, username: &str, role: &str) -> String {
    create_user(pool, username, role).await;
    let data = login(build_test_app(pool.clone()), username).await;
    data["access"]
        .as_str()
        .expect("access token should be a string")
        .to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    request(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// GET with a `Host` header, so file URLs come back absolute.
pub async fn get_with_host(app: Router, uri: &str, host: &str) -> Response {
    let req = request("GET", uri, None)
        .header(HOST, host)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("POST", uri, body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("POST", uri, body, Some(token))).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("PUT", uri, body, None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("PUT", uri, body, Some(token))).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request("PATCH", uri, body, None)).await
}

/// Send `body` verbatim with a JSON content type, for bodies that do not parse.
pub async fn send_raw_json(app: Router, method: &str, uri: &str, body: &str) -> Response {
    let req = request(method, uri, None)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request("PATCH", uri, body, Some(token))).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, request("DELETE", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request("DELETE", uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// A `multipart/form-data` POST built from text fields and one file part.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
    token: &str,
) -> Response {
    const BOUNDARY: &str = "baja-test-boundary";

    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = request("POST", uri, Some(token))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a category through the API and return its JSON.
pub async fn create_category(app: Router, token: &str, name: &str) -> Value {
    let response = post_json_auth(app, "/api/categories/", json!({ "name": name }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create an instrument in `category` (by name) through the API.
pub async fn create_instrument(app: Router, token: &str, name: &str, category: &str) -> Value {
    let response = post_json_auth(
        app,
        "/api/instruments/",
        json!({
            "name": name,
            "category": category,
            "region": "Nepal",
            "description": format!("{name} description"),
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
