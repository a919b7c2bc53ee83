//! Email templates and the outgoing email queue.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::email_template::EmailTemplateType;
use masterclass_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailTemplate {
    pub id: DbId,
    pub name: String,
    pub template_type: String,
    pub subject: String,
    pub content: String,
    pub auto_send: bool,
    pub send_delay_minutes: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmailTemplate {
    #[validate(length(min = 1, max = 200, message = "Template name must be between 1 and 200 characters"))]
    pub name: String,
    pub template_type: EmailTemplateType,
    #[validate(length(min = 1, max = 300))]
    pub subject: String,
    #[validate(length(max = 50000))]
    pub content: String,
    #[serde(default)]
    pub auto_send: bool,
    #[serde(default)]
    #[validate(range(min = 0, max = 43200))]
    pub send_delay_minutes: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEmailTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub template_type: Option<EmailTemplateType>,
    #[validate(length(min = 1, max = 300))]
    pub subject: Option<String>,
    #[validate(length(max = 50000))]
    pub content: Option<String>,
    pub auto_send: Option<bool>,
    #[validate(range(min = 0, max = 43200))]
    pub send_delay_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

/// Variables supplied to the preview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewEmailTemplate {
    #[serde(default)]
    pub variables: std::collections::HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

pub const QUEUE_PENDING: &str = "pending";
pub const QUEUE_SENT: &str = "sent";
pub const QUEUE_FAILED: &str = "failed";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueuedEmail {
    pub id: DbId,
    pub template_id: Option<DbId>,
    pub recipient_email: String,
    pub variables: serde_json::Value,
    pub send_at: Timestamp,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateQueuedEmail {
    pub template_id: DbId,
    pub recipient_email: String,
    pub variables: serde_json::Value,
    pub send_at: Timestamp,
}
