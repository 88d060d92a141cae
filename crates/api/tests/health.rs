mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, get, test_config};
use sqlx::PgPool;

/// GET /health reports the database and media root outside `/api`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["media_writable"], true);
    assert!(json["version"].is_string());
}

/// An unusable media root takes the service out of rotation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_media_root_unavailable(pool: PgPool) {
    let blocker = std::env::temp_dir().join(format!("baja-blocker-{}", uuid::Uuid::new_v4()));
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut config = test_config();
    config.media.root = blocker.join("media");

    let response = get(build_test_app_with(pool, config), "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["media_writable"], false);

    std::fs::remove_file(&blocker).unwrap();
}

/// Unknown API paths are plain 404s.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/drums/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
