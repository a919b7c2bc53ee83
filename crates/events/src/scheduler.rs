//! Queued email scheduler.
//!
//! [`EmailScheduler`] runs as a background task, periodically picking up due
//! rows from `email_queue`, rendering them with their template and handing
//! them to a [`Mailer`]. Each row is marked sent or failed; failures are
//! retried on later ticks until the attempt limit is reached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use masterclass_core::email_template::{render_email, vars_from_json};
use masterclass_core::types::DbId;
use masterclass_db::models::email::{EmailTemplate, QueuedEmail};
use masterclass_db::repositories::{EmailQueueRepo, EmailTemplateRepo};
use masterclass_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::delivery::{Mailer, OutgoingEmail};

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Attempts after which a queued email is marked `failed`.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 3;

/// Rows picked up per tick.
pub const DEFAULT_BATCH_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    pub max_attempts: i32,
    pub batch_size: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub sent: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// EmailScheduler
// ---------------------------------------------------------------------------

pub struct EmailScheduler {
    pool: DbPool,
    mailer: Arc<dyn Mailer>,
    config: SchedulerConfig,
}

impl EmailScheduler {
    pub fn new(pool: DbPool, mailer: Arc<dyn Mailer>, config: SchedulerConfig) -> Self {
        Self {
            pool,
            mailer,
            config,
        }
    }

    /// Run the scheduler loop until `cancel` fires.
    ///
    /// Database errors are logged and the loop carries on with the next tick.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        tracing::info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Email scheduler started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Email scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    match self.process_due().await {
                        Ok(summary) if summary.sent + summary.failed > 0 => {
                            tracing::info!(sent = summary.sent, failed = summary.failed, "Processed queued emails");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!(error = %e, "Failed to process email queue"),
                    }
                }
            }
        }
    }

    /// Send every due row once.
    pub async fn process_due(&self) -> Result<TickSummary, sqlx::Error> {
        let due = EmailQueueRepo::list_due(&self.pool, self.config.max_attempts, self.config.batch_size)
            .await?;

        let mut templates: HashMap<DbId, Option<EmailTemplate>> = HashMap::new();
        let mut summary = TickSummary::default();

        for row in &due {
            let template = match row.template_id {
                Some(id) => {
                    if !templates.contains_key(&id) {
                        let found = EmailTemplateRepo::find_by_id(&self.pool, id).await?;
                        templates.insert(id, found);
                    }
                    templates.get(&id).cloned().flatten()
                }
                None => None,
            };

            let Some(template) = template else {
                // Template deleted since the row was queued.
                EmailQueueRepo::mark_failed(&self.pool, row.id, "Template no longer exists", 0).await?;
                summary.failed += 1;
                continue;
            };

            if self.deliver(row, &template).await? {
                summary.sent += 1;
            } else {
                summary.failed += 1;
            }
        }

        Ok(summary)
    }

    /// Render and send one row. Returns whether it was sent.
    async fn deliver(&self, row: &QueuedEmail, template: &EmailTemplate) -> Result<bool, sqlx::Error> {
        let vars = vars_from_json(&row.variables);
        let rendered = render_email(&template.subject, &template.content, &vars);
        if !rendered.missing.is_empty() {
            tracing::warn!(
                queue_id = row.id,
                missing = ?rendered.missing,
                "Queued email has unfilled placeholders"
            );
        }

        let email = OutgoingEmail {
            to: row.recipient_email.clone(),
            subject: rendered.subject,
            body: rendered.content,
        };

        match self.mailer.send(&email).await {
            Ok(()) => {
                EmailQueueRepo::mark_sent(&self.pool, row.id).await?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(queue_id = row.id, to = %row.recipient_email, error = %e, "Email delivery failed");
                EmailQueueRepo::mark_failed(&self.pool, row.id, &e.to_string(), self.config.max_attempts)
                    .await?;
                Ok(false)
            }
        }
    }
}
