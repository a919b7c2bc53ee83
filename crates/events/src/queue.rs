//! Enqueueing template emails.

use chrono::{Duration, Utc};
use masterclass_core::email_template::EmailTemplateType;
use masterclass_db::models::email::{CreateQueuedEmail, QueuedEmail};
use masterclass_db::repositories::{EmailQueueRepo, EmailTemplateRepo};
use masterclass_db::DbPool;

/// Queue an email built from the active template of `template_type`.
///
/// Nothing is queued (`Ok(None)`) when no active template of that type exists
/// or when it is not flagged auto-send. The row becomes due after the
/// template's send delay.
pub async fn queue_template_email(
    pool: &DbPool,
    template_type: EmailTemplateType,
    recipient_email: &str,
    variables: serde_json::Value,
) -> Result<Option<QueuedEmail>, sqlx::Error> {
    let Some(template) = EmailTemplateRepo::find_active_by_type(pool, template_type).await? else {
        tracing::debug!(template_type = %template_type, "No active template, email not queued");
        return Ok(None);
    };
    if !template.auto_send {
        return Ok(None);
    }

    let send_at = Utc::now() + Duration::minutes(i64::from(template.send_delay_minutes));
    let queued = EmailQueueRepo::enqueue(
        pool,
        &CreateQueuedEmail {
            template_id: template.id,
            recipient_email: recipient_email.to_string(),
            variables,
            send_at,
        },
    )
    .await?;

    tracing::info!(
        queue_id = queued.id,
        template_id = template.id,
        template_type = %template_type,
        %send_at,
        "Email queued"
    );
    Ok(Some(queued))
}
