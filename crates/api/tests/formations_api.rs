//! Public formation catalogue and admin formation/session management.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_db::repositories::ActivityLogRepo;

fn formation_body(slug: &str, published: bool) -> serde_json::Value {
    json!({
        "title": format!("Formation {slug}"),
        "slug": slug,
        "description": "Orthodontie neuro-musculaire",
        "level": "intermediaire",
        "price_cents": 129000,
        "duration_hours": 14,
        "is_published": published
    })
}

async fn create_formation(pool: &PgPool, token: &str, slug: &str, published: bool) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/formations",
        token,
        formation_body(slug, published),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_catalogue_hides_unpublished(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let published = create_formation(&pool, &token, "onm-1", true).await;
    let draft = create_formation(&pool, &token, "onm-draft", false).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/formations").await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await["data"].clone();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], published);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/formations/{draft}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/formations/{draft}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_formation_logs_activity(pool: PgPool) {
    let (admin, token) = common::admin_with_token(&pool).await;
    let id = create_formation(&pool, &token, "onm-log", false).await;

    let logs = ActivityLogRepo::list_for_entity(&pool, entity_types::FORMATION, id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, action_types::CREATE_FORMATION);
    assert_eq!(logs[0].admin_id, Some(admin.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_formation_validation(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let mut body = formation_body("onm-bad", false);
    body["duration_hours"] = json!(0);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/formations",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = formation_body("onm-bad", false);
    body["level"] = json!("grand-maitre");
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/formations",
        &token,
        body,
    )
    .await;
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_conflicts(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    create_formation(&pool, &token, "onm-dup", false).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/formations",
        &token,
        formation_body("onm-dup", false),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_formation(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let id = create_formation(&pool, &token, "onm-edit", false).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/formations/{id}"),
        &token,
        json!({ "is_published": true, "price_cents": 99000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["is_published"], true);
    assert_eq!(data["price_cents"], 99000);
    assert_eq!(data["slug"], "onm-edit");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/formations/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/formations/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_list_filters_by_level_and_query(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    create_formation(&pool, &token, "onm-a", true).await;
    create_formation(&pool, &token, "onm-b", false).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/formations?is_published=false",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["slug"], "onm-b");

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/formations?level=expert",
        &token,
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert!(page["items"].as_array().unwrap().is_empty());

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/formations?level=unknown",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let formation_id = create_formation(&pool, &token, "onm-sessions", true).await;
    let base = format!("/api/v1/admin/formations/{formation_id}/sessions");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &base,
        &token,
        json!({
            "starts_at": "2030-03-01T09:00:00Z",
            "ends_at": "2030-03-02T17:00:00Z",
            "location": "Paris",
            "capacity": 20
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/{session_id}"),
        &token,
        json!({ "seats_taken": 25 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/{session_id}"),
        &token,
        json!({ "seats_taken": 12, "location": "Lyon" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["seats_taken"], 12);
    assert_eq!(data["location"], "Lyon");

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/formations/{formation_id}"),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["sessions"].as_array().unwrap().len(), 1);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/{session_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &base, &token).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_dates_must_be_ordered(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let formation_id = create_formation(&pool, &token, "onm-dates", true).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/formations/{formation_id}/sessions"),
        &token,
        json!({
            "starts_at": "2030-03-02T09:00:00Z",
            "ends_at": "2030-03-01T17:00:00Z",
            "location": "Paris",
            "capacity": 20
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sessions_of_missing_formation_is_404(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/formations/999999/sessions",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
