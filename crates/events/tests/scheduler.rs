//! Email queue processing against a real database with in-memory mailers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use masterclass_core::email_template::EmailTemplateType;
use masterclass_db::models::email::{CreateEmailTemplate, CreateQueuedEmail, UpdateEmailTemplate};
use masterclass_db::repositories::{EmailQueueRepo, EmailTemplateRepo};
use masterclass_events::{
    queue_template_email, EmailError, EmailScheduler, Mailer, OutgoingEmail, SchedulerConfig,
    TickSummary,
};

// ---------------------------------------------------------------------------
// Mailers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), EmailError> {
        Err(EmailError::Build("relay unavailable".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn welcome_template(pool: &PgPool, auto_send: bool, delay: i32) -> i64 {
    EmailTemplateRepo::create(
        pool,
        &CreateEmailTemplate {
            name: "Bienvenue".to_string(),
            template_type: EmailTemplateType::Welcome,
            subject: "Bienvenue {{ first_name }}".to_string(),
            content: "Bonjour {{first_name}}, votre code est {{ referral_code }}.".to_string(),
            auto_send,
            send_delay_minutes: delay,
        },
    )
    .await
    .unwrap()
    .id
}

async fn enqueue_due(pool: &PgPool, template_id: i64) -> i64 {
    EmailQueueRepo::enqueue(
        pool,
        &CreateQueuedEmail {
            template_id,
            recipient_email: "claire@example.fr".to_string(),
            variables: json!({ "first_name": "Claire", "referral_code": "A1B2C3D4" }),
            send_at: Utc::now() - Duration::minutes(1),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_due_email_is_rendered_and_sent(pool: PgPool) {
    let template_id = welcome_template(&pool, true, 0).await;
    let queue_id = enqueue_due(&pool, template_id).await;

    let mailer = Arc::new(RecordingMailer::default());
    let scheduler = EmailScheduler::new(pool.clone(), mailer.clone(), SchedulerConfig::default());

    let summary = scheduler.process_due().await.unwrap();
    assert_eq!(summary, TickSummary { sent: 1, failed: 0 });

    let sent = mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Bienvenue Claire");
    assert_eq!(sent[0].body, "Bonjour Claire, votre code est A1B2C3D4.");

    let row = EmailQueueRepo::find_by_id(&pool, queue_id).await.unwrap().unwrap();
    assert_eq!(row.status, "sent");

    // Nothing left on the next tick.
    let again = scheduler.process_due().await.unwrap();
    assert_eq!(again, TickSummary::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failures_are_retried_then_given_up(pool: PgPool) {
    let template_id = welcome_template(&pool, true, 0).await;
    let queue_id = enqueue_due(&pool, template_id).await;

    let config = SchedulerConfig {
        max_attempts: 2,
        ..SchedulerConfig::default()
    };
    let scheduler = EmailScheduler::new(pool.clone(), Arc::new(FailingMailer), config);

    assert_eq!(scheduler.process_due().await.unwrap().failed, 1);
    let row = EmailQueueRepo::find_by_id(&pool, queue_id).await.unwrap().unwrap();
    assert_eq!((row.status.as_str(), row.attempts), ("pending", 1));

    assert_eq!(scheduler.process_due().await.unwrap().failed, 1);
    let row = EmailQueueRepo::find_by_id(&pool, queue_id).await.unwrap().unwrap();
    assert_eq!(row.status, "failed");
    assert!(row.last_error.unwrap().contains("relay unavailable"));

    assert_eq!(scheduler.process_due().await.unwrap(), TickSummary::default());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_template_fails_row(pool: PgPool) {
    let template_id = welcome_template(&pool, true, 0).await;
    let queue_id = enqueue_due(&pool, template_id).await;
    EmailTemplateRepo::delete(&pool, template_id).await.unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let scheduler = EmailScheduler::new(pool.clone(), mailer.clone(), SchedulerConfig::default());
    assert_eq!(scheduler.process_due().await.unwrap().failed, 1);
    assert!(mailer.sent.lock().unwrap().is_empty());

    let row = EmailQueueRepo::find_by_id(&pool, queue_id).await.unwrap().unwrap();
    assert_eq!(row.status, "failed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_queue_respects_auto_send_and_delay(pool: PgPool) {
    let vars = json!({ "first_name": "Claire" });

    // No template at all.
    let none = queue_template_email(&pool, EmailTemplateType::Welcome, "c@example.fr", vars.clone())
        .await
        .unwrap();
    assert!(none.is_none());

    let template_id = welcome_template(&pool, false, 90).await;
    let manual = queue_template_email(&pool, EmailTemplateType::Welcome, "c@example.fr", vars.clone())
        .await
        .unwrap();
    assert!(manual.is_none());

    EmailTemplateRepo::update(
        &pool,
        template_id,
        &UpdateEmailTemplate {
            auto_send: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let queued = queue_template_email(&pool, EmailTemplateType::Welcome, "c@example.fr", vars)
        .await
        .unwrap()
        .unwrap();
    assert!(queued.send_at > Utc::now() + Duration::minutes(89));

    // Delayed rows are not due yet.
    let scheduler = EmailScheduler::new(
        pool.clone(),
        Arc::new(RecordingMailer::default()),
        SchedulerConfig::default(),
    );
    assert_eq!(scheduler.process_due().await.unwrap(), TickSummary::default());
}
