//! Repository for the `email_templates` and `email_queue` tables.

use sqlx::PgPool;
use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::types::DbId;

use crate::models::email::{
    CreateEmailTemplate, CreateQueuedEmail, EmailTemplate, QueuedEmail, UpdateEmailTemplate,
    QUEUE_FAILED, QUEUE_PENDING, QUEUE_SENT,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "id, name, template_type, subject, content, auto_send, send_delay_minutes, \
                        is_active, created_at, updated_at";

const QUEUE_COLUMNS: &str = "id, template_id, recipient_email, variables, send_at, status, \
                              attempts, last_error, sent_at, created_at, updated_at";

// ---------------------------------------------------------------------------
// EmailTemplateRepo
// ---------------------------------------------------------------------------

pub struct EmailTemplateRepo;

impl EmailTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateEmailTemplate,
    ) -> Result<EmailTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_templates
                (name, template_type, subject, content, auto_send, send_delay_minutes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(&input.name)
            .bind(input.template_type.as_str())
            .bind(&input.subject)
            .bind(&input.content)
            .bind(input.auto_send)
            .bind(input.send_delay_minutes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates WHERE id = $1");
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All templates grouped by type, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates ORDER BY template_type, name");
        sqlx::query_as::<_, EmailTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Most recently updated active template of a type.
    pub async fn find_active_by_type(
        pool: &PgPool,
        template_type: EmailTemplateType,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_templates
             WHERE template_type = $1 AND is_active = true
             ORDER BY updated_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(template_type.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmailTemplate,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE email_templates SET
                name = COALESCE($2, name),
                template_type = COALESCE($3, template_type),
                subject = COALESCE($4, subject),
                content = COALESCE($5, content),
                auto_send = COALESCE($6, auto_send),
                send_delay_minutes = COALESCE($7, send_delay_minutes),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.template_type.map(|t| t.as_str()))
            .bind(&input.subject)
            .bind(&input.content)
            .bind(input.auto_send)
            .bind(input.send_delay_minutes)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// EmailQueueRepo
// ---------------------------------------------------------------------------

/// Outgoing emails waiting for the scheduler.
pub struct EmailQueueRepo;

impl EmailQueueRepo {
    pub async fn enqueue(pool: &PgPool, input: &CreateQueuedEmail) -> Result<QueuedEmail, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_queue (template_id, recipient_email, variables, send_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {QUEUE_COLUMNS}"
        );
        sqlx::query_as::<_, QueuedEmail>(&query)
            .bind(input.template_id)
            .bind(&input.recipient_email)
            .bind(&input.variables)
            .bind(input.send_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QueuedEmail>, sqlx::Error> {
        let query = format!("SELECT {QUEUE_COLUMNS} FROM email_queue WHERE id = $1");
        sqlx::query_as::<_, QueuedEmail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Pending rows whose `send_at` has passed and that have attempts left,
    /// oldest first.
    pub async fn list_due(
        pool: &PgPool,
        max_attempts: i32,
        limit: i64,
    ) -> Result<Vec<QueuedEmail>, sqlx::Error> {
        let query = format!(
            "SELECT {QUEUE_COLUMNS} FROM email_queue
             WHERE status = $1 AND send_at <= NOW() AND attempts < $2
             ORDER BY send_at ASC, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, QueuedEmail>(&query)
            .bind(QUEUE_PENDING)
            .bind(max_attempts)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE email_queue SET status = $2, sent_at = NOW(), attempts = attempts + 1,
                                    last_error = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(QUEUE_SENT)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a failed attempt. The row stays pending until `max_attempts` is
    /// reached, then moves to `failed`.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error: &str,
        max_attempts: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE email_queue SET
                attempts = attempts + 1,
                last_error = $2,
                status = CASE WHEN attempts + 1 >= $3 THEN $4 ELSE status END
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .bind(max_attempts)
        .bind(QUEUE_FAILED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
