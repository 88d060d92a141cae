//! Integration tests for the contact inbox and learning content.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, delete, get, get_auth, patch_json, patch_json_auth,
    post_json, post_json_auth, put_json, send_raw_json, user_token,
};
use serde_json::json;
use sqlx::PgPool;

async fn submit(pool: &PgPool, subject: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/contact/",
        json!({
            "name": "Sita",
            "email": "sita@example.org",
            "subject": subject,
            "message": "Where can I learn sarangi?",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Anyone may submit; the message always starts unread.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_public_submit(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/contact/",
        json!({
            "name": "Hari",
            "email": "hari@example.org",
            "subject": "Hello",
            "message": "Nice catalog",
            "is_read": true,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_read"], false);
    assert!(json["data"]["created_at"].is_string());
}

/// A malformed email is a field error.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_invalid_email(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/contact/",
        json!({
            "name": "Hari",
            "email": "not-an-email",
            "subject": "Hello",
            "message": "Hi",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["email"].is_array());
}

/// Only admins can read the inbox.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_inbox_is_admin_only(pool: PgPool) {
    submit(&pool, "Question").await;
    let user = user_token(&pool).await;
    let admin = admin_token(&pool).await;

    let response = get(build_test_app(pool.clone()), "/api/contact/").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool.clone()), "/api/contact/", &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(build_test_app(pool), "/api/contact/", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// A single message is admin-only for every method, and anonymous callers
/// get 401 before their body is looked at.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_item_requires_login(pool: PgPool) {
    let id = submit(&pool, "Private").await;
    let item = format!("/api/contact/{id}/");

    let response = get(build_test_app(pool.clone()), &item).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json(build_test_app(pool.clone()), &item, json!({ "is_read": true })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/contact/1/",
        json!({ "is_read": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        patch_json(build_test_app(pool.clone()), &item, json!({ "is_read": "yes" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_raw_json(build_test_app(pool.clone()), "PUT", &item, "not json").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_raw_json(
        build_test_app(pool.clone()),
        "POST",
        "/api/contact/mark-read/",
        "{\"ids\": ",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(build_test_app(pool.clone()), &item).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = user_token(&pool).await;
    let response = get_auth(build_test_app(pool.clone()), &item, &user).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The message is untouched.
    let admin = admin_token(&pool).await;
    let response = get_auth(build_test_app(pool), &item, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["subject"], "Private");
    assert_eq!(json["data"]["is_read"], false);
}

/// Bulk read-state actions report how many rows changed and drive the filter.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_mark_read_and_unread(pool: PgPool) {
    let first = submit(&pool, "First").await;
    let second = submit(&pool, "Second").await;
    submit(&pool, "Third").await;
    let admin = admin_token(&pool).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/contact/mark-read/",
        json!({ "ids": [first, second, 9999] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/contact/?is_read=false",
        &admin,
    )
    .await;
    let unread = body_json(response).await["data"].clone();
    assert_eq!(unread.as_array().unwrap().len(), 1);
    assert_eq!(unread[0]["subject"], "Third");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/contact/mark-unread/",
        json!({ "ids": [second] }),
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["updated"], 1);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/contact/?is_read=true",
        &admin,
    )
    .await;
    let read = body_json(response).await["data"].clone();
    assert_eq!(read.as_array().unwrap().len(), 1);
    assert_eq!(read[0]["id"], first);

    // Bulk actions are admin-only and need at least one id.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/contact/mark-read/",
        json!({ "ids": [first] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        build_test_app(pool),
        "/api/contact/mark-read/",
        json!({ "ids": [] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Admins can flip the read flag on a single message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_patch_read_flag(pool: PgPool) {
    let id = submit(&pool, "Flag me").await;
    let admin = admin_token(&pool).await;

    let response = patch_json_auth(
        build_test_app(pool),
        &format!("/api/contact/{id}/"),
        json!({ "is_read": true }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_read"], true);
    assert_eq!(json["data"]["subject"], "Flag me");
}

// ---------------------------------------------------------------------------
// Learning content
// ---------------------------------------------------------------------------

/// Learning content is open for writes and lists in path order.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_learning_open_and_ordered(pool: PgPool) {
    for (title, order) in [("Rhythm", 2), ("Basics", 1), ("Advanced", 3), ("Anatomy", 1)] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/learning/",
            json!({ "title": title, "content": "...", "order": order }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(build_test_app(pool.clone()), "/api/learning/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Anatomy", "Basics", "Rhythm", "Advanced"]);

    let first_id = json["data"][0]["id"].as_i64().unwrap();
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/learning/{first_id}/"),
        json!({ "title": "Anatomy", "content": "Rewritten", "order": 5, "is_published": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["order"], 5);
    assert_eq!(json["data"]["is_published"], false);

    let response = get(
        build_test_app(pool.clone()),
        "/api/learning/?is_published=false",
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = delete(build_test_app(pool), &format!("/api/learning/{first_id}/")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Negative order values are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_learning_negative_order(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/learning/",
        json!({ "title": "Oops", "content": "...", "order": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["order"].is_array());
}
