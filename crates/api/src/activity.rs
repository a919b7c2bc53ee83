//! Recording admin mutations in the activity history.

use serde::Serialize;

use masterclass_core::activity::redact_sensitive_fields;
use masterclass_core::types::DbId;
use masterclass_db::models::activity_log::CreateActivityLog;
use masterclass_db::repositories::ActivityLogRepo;
use masterclass_db::DbPool;

use crate::middleware::auth::AuthUser;

/// Append an activity row for a mutation that already succeeded.
///
/// `details` is serialized and redacted before storage. A failed append is
/// logged and swallowed: the mutation it describes is already committed.
pub async fn record<D: Serialize>(
    pool: &DbPool,
    admin: &AuthUser,
    action_type: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
    details: &D,
) {
    let details = match serde_json::to_value(details) {
        Ok(value) => Some(redact_sensitive_fields(&value)),
        Err(e) => {
            tracing::warn!(error = %e, action_type, "Activity details not serializable");
            None
        }
    };

    let input = CreateActivityLog {
        admin_id: Some(admin.user_id),
        action_type: action_type.to_string(),
        entity_type: Some(entity_type.to_string()),
        entity_id,
        details,
    };

    if let Err(e) = ActivityLogRepo::append(pool, &input).await {
        tracing::error!(
            error = %e,
            admin_id = admin.user_id,
            action_type,
            "Failed to append activity log"
        );
    }
}
