//! Back-office flows: contacts, notifications, email templates,
//! satisfaction surveys, referrals and the activity history.

mod common;

use axum::http::header::CONTENT_DISPOSITION;
use axum::http::StatusCode;
use common::{
    body_bytes, body_json, delete_auth, get_auth, patch_json_auth, post_json, post_json_auth,
    put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::referral::{
    cumulative_reward_points, generate_code, ReferralStatus, REFERRAL_CONVERSION_POINTS,
};
use masterclass_db::models::referral::CreateReferral;
use masterclass_db::repositories::{
    ActivityLogRepo, ContactRepo, EmailQueueRepo, PointRepo, ReferralRepo, SatisfactionRepo,
};

async fn submit_contact(pool: &PgPool, name: &str, subject: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/contact",
        json!({
            "name": name,
            "email": "visiteur@example.com",
            "subject": subject,
            "message": "Bonjour, je souhaite des informations."
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Contacts and notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_flow(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let id = submit_contact(&pool, "Jeanne Dupont", "Tarifs").await;
    submit_contact(&pool, "Paul Durand", "Dates des sessions").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/contacts?q=jeanne&status=nouveau",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["id"], id);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/contacts/{id}/status"),
        &token,
        json!({ "status": "traite" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "traite");

    let logs = ActivityLogRepo::list_for_entity(&pool, entity_types::CONTACT, id)
        .await
        .unwrap();
    assert_eq!(logs[0].action_type, action_types::UPDATE_CONTACT_STATUS);
    assert_eq!(logs[0].details.as_ref().unwrap()["from"], "nouveau");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/contacts/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/contacts/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submissions_survive_notification_failure(pool: PgPool) {
    sqlx::query("DROP TABLE notifications")
        .execute(&pool)
        .await
        .unwrap();

    submit_contact(&pool, "Sans Alerte", "Programme").await;
    assert_eq!(ContactRepo::count(&pool).await.unwrap(), 1);

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/satisfaction",
        json!({ "rating": 4, "recommendation": 8 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(SatisfactionRepo::count(&pool, None).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_rejects_blank_message(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/contact",
        json!({
            "name": "Vide",
            "email": "vide@example.com",
            "subject": "Question",
            "message": "   "
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_list_rejects_unknown_status(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/contacts?status=perdu",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notifications_read_state(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    submit_contact(&pool, "Alice", "Inscription").await;
    submit_contact(&pool, "Bob", "Facture").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notifications/unread-count",
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["unread"], 2);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notifications",
        &token,
    )
    .await;
    let list = body_json(response).await["data"].clone();
    let first_id = list[0]["id"].as_i64().unwrap();
    assert_eq!(list[0]["kind"], "contact");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/notifications/{first_id}/read"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_read"], true);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notifications?unread_only=true",
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/notifications/read-all",
        &token,
        json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["updated"], 1);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/notifications/999999/read",
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Email templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_template_crud_and_preview(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/email-templates",
        &token,
        json!({
            "name": "Confirmation contact",
            "template_type": "contact_confirmation",
            "subject": "Merci {{name}}",
            "content": "Votre demande « {{ subject }} » est bien reçue. {{signature}}",
            "auto_send": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/email-templates/{id}/preview"),
        &token,
        json!({ "variables": { "name": "Jeanne", "subject": "Tarifs" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await["data"].clone();
    assert_eq!(preview["subject"], "Merci Jeanne");
    assert!(preview["content"].as_str().unwrap().contains("« Tarifs »"));
    assert_eq!(preview["missing"], json!(["signature"]));
    assert_eq!(preview["placeholders"], json!(["name", "signature", "subject"]));

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/email-templates/{id}"),
        &token,
        json!({ "send_delay_minutes": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["send_delay_minutes"], 10);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/email-templates/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/email-templates/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_auto_send_template_queues_confirmation(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/email-templates",
        &token,
        json!({
            "name": "Accusé de réception",
            "template_type": "contact_confirmation",
            "subject": "Merci {{name}}",
            "content": "Nous revenons vers vous rapidement.",
            "auto_send": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    submit_contact(&pool, "Jeanne", "Tarifs").await;

    let due = EmailQueueRepo::list_due(&pool, 3, 10).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].recipient_email, "visiteur@example.com");
    assert_eq!(due[0].variables["name"], "Jeanne");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_email_template_rejects_blank_subject(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/email-templates",
        &token,
        json!({
            "name": "Sans objet",
            "template_type": "welcome",
            "subject": "  ",
            "content": "Bienvenue"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Satisfaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_satisfaction_overview(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    for (rating, recommendation) in [(5, 10), (4, 9), (2, 3)] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/satisfaction",
            json!({ "rating": rating, "recommendation": recommendation }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/satisfaction?limit=2",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["responses"]["total"], 3);
    assert_eq!(data["responses"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(data["stats"]["responses"], 3);
    assert_eq!(data["stats"]["promoters"], 2);
    assert_eq!(data["stats"]["detractors"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_satisfaction_rejects_out_of_range_rating(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/satisfaction",
        json!({ "rating": 6 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Referrals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referral_status_change_follows_reward(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let (referrer, _) = common::member_with_token(&pool, "parrain@example.com").await;
    let referral = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "cible@example.com".to_string(),
            referee_name: None,
            code: generate_code(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();
    let uri = format!("/api/v1/admin/referrals/{}/status", referral.id);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "status": "converted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let converted = PointRepo::total_for_user(&pool, referrer.id).await.unwrap();
    assert!(converted >= i64::from(REFERRAL_CONVERSION_POINTS));

    // Same status again: no further credit.
    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "status": "converted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        PointRepo::total_for_user(&pool, referrer.id).await.unwrap(),
        converted
    );

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "status": "expired" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(PointRepo::total_for_user(&pool, referrer.id).await.unwrap(), 0);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/referrals?status=expired",
        &token,
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_status_changes_credit_once(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let (referrer, _) = common::member_with_token(&pool, "double@example.com").await;
    let referral = ReferralRepo::create(
        &pool,
        &CreateReferral {
            referrer_id: referrer.id,
            referee_email: "clic@example.com".to_string(),
            referee_name: None,
            code: generate_code(),
            message: None,
            status: ReferralStatus::Pending,
            referee_user_id: None,
        },
    )
    .await
    .unwrap();
    let uri = format!("/api/v1/admin/referrals/{}/status", referral.id);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = common::build_test_app(pool.clone());
            let uri = uri.clone();
            let token = token.clone();
            tokio::spawn(async move {
                patch_json_auth(app, &uri, &token, json!({ "status": "converted" }))
                    .await
                    .status()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let total = PointRepo::total_for_user(&pool, referrer.id).await.unwrap();
    assert_eq!(
        total,
        i64::from(cumulative_reward_points(ReferralStatus::Converted))
    );
}

// ---------------------------------------------------------------------------
// Activity history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activity_history_filters_and_groups(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;
    let id = submit_contact(&pool, "Historique", "Suivi").await;
    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/contacts/{id}/status"),
        &token,
        json!({ "status": "lu" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/activity-logs?entity_type=contact",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["action_type"], action_types::UPDATE_CONTACT_STATUS);
    assert!(page["items"][0]["label"].is_string());
    assert!(page["items"][0]["admin_name"].is_string());

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/activity-logs?group_by=month",
        &token,
    )
    .await;
    let page = body_json(response).await["data"].clone();
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert!(page["items"][0]["label"].is_string());
    assert_eq!(page["items"][0]["items"].as_array().unwrap().len(), 1);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/activity-logs?group_by=week",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activity_export_is_itself_logged(pool: PgPool) {
    let (_admin, token) = common::admin_with_token(&pool).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/activity-logs/export",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("historique_activites_"));
    assert!(!body_bytes(response).await.is_empty());

    let logs = ActivityLogRepo::list_page(&pool, 10, 0).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, action_types::EXPORT);
    assert_eq!(logs[0].entity_type.as_deref(), Some(entity_types::ACTIVITY_LOG));
}
