//! Integration tests for the token endpoints and bearer-token handling.

mod common;

use axum::http::StatusCode;
use baja_core::roles::{ROLE_ADMIN, ROLE_USER};
use common::{
    body_json, build_test_app, create_user, get, get_auth, login, post_json, post_json_auth,
    TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

/// Valid credentials yield an access/refresh pair inside the data envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_success(pool: PgPool) {
    create_user(&pool, "tokenuser", ROLE_ADMIN).await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/auth/token/",
        json!({ "username": "tokenuser", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["access"].is_string());
    assert!(json["data"]["refresh"].is_string());
    assert_eq!(json["data"]["expires_in"], 15 * 60);
}

/// Wrong passwords and unknown users get the same 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_bad_credentials(pool: PgPool) {
    create_user(&pool, "realuser", ROLE_USER).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/auth/token/",
        json!({ "username": "realuser", "password": "wrong_password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = post_json(
        build_test_app(pool),
        "/api/auth/token/",
        json!({ "username": "ghost", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(response).await;

    assert_eq!(wrong_password["code"], "UNAUTHORIZED");
    assert_eq!(wrong_password["error"], unknown_user["error"]);
}

/// Deactivated accounts cannot obtain tokens.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_inactive_user(pool: PgPool) {
    let user = create_user(&pool, "sleeper", ROLE_ADMIN).await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(
        build_test_app(pool),
        "/api/auth/token/",
        json!({ "username": "sleeper", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Blank credentials fail payload validation before any lookup.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_blank_fields(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/auth/token/",
        json!({ "username": "", "password": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["username"].is_array());
    assert!(json["fields"]["password"].is_array());
}

/// A refresh token rotates once; presenting it again is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotation(pool: PgPool) {
    create_user(&pool, "rotator", ROLE_ADMIN).await;
    let tokens = login(build_test_app(pool.clone()), "rotator").await;
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/auth/token/refresh/",
        json!({ "refresh": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert!(rotated["data"]["access"].is_string());
    assert_ne!(rotated["data"]["refresh"], json!(refresh));

    let reuse = post_json(
        build_test_app(pool),
        "/api/auth/token/refresh/",
        json!({ "refresh": refresh }),
    )
    .await;
    assert_eq!(reuse.status(), StatusCode::UNAUTHORIZED);
}

/// Garbage refresh tokens are a 401, not a 500.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_unknown_token(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/auth/token/refresh/",
        json!({ "refresh": "not-a-real-token" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes outstanding refresh tokens.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh(pool: PgPool) {
    create_user(&pool, "leaver", ROLE_USER).await;
    let tokens = login(build_test_app(pool.clone()), "leaver").await;
    let access = tokens["access"].as_str().unwrap();
    let refresh = tokens["refresh"].as_str().unwrap();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/auth/logout/",
        json!({}),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        build_test_app(pool),
        "/api/auth/token/refresh/",
        json!({ "refresh": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout needs a token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_requires_auth(pool: PgPool) {
    let response = post_json(build_test_app(pool), "/api/auth/logout/", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A malformed bearer token is rejected even on a public read.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_token_on_public_read(pool: PgPool) {
    let response = get_auth(build_test_app(pool.clone()), "/api/instruments/", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Without any header the same read is open.
    let response = get(build_test_app(pool), "/api/instruments/").await;
    assert_eq!(response.status(), StatusCode::OK);
}
