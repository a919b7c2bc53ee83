//! Admin activity history: action types, entity types and redaction.
//!
//! Action types are stored as free-form strings so older rows with unknown
//! actions still render; the lookups below fall back to a generic label.

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for activity log entries.
pub mod action_types {
    pub const CREATE_FORMATION: &str = "create_formation";
    pub const UPDATE_FORMATION: &str = "update_formation";
    pub const DELETE_FORMATION: &str = "delete_formation";
    pub const CREATE_SESSION: &str = "create_session";
    pub const UPDATE_SESSION: &str = "update_session";
    pub const DELETE_SESSION: &str = "delete_session";
    pub const UPDATE_CONTACT_STATUS: &str = "update_contact_status";
    pub const DELETE_CONTACT: &str = "delete_contact";
    pub const CREATE_EMAIL_TEMPLATE: &str = "create_email_template";
    pub const UPDATE_EMAIL_TEMPLATE: &str = "update_email_template";
    pub const DELETE_EMAIL_TEMPLATE: &str = "delete_email_template";
    pub const CREATE_BADGE: &str = "create_badge";
    pub const AWARD_BADGE: &str = "award_badge";
    pub const UPDATE_REFERRAL_STATUS: &str = "update_referral_status";
    pub const EXPORT: &str = "export";
}

/// Known entity types referenced by activity log entries.
pub mod entity_types {
    pub const FORMATION: &str = "formation";
    pub const FORMATION_SESSION: &str = "formation_session";
    pub const CONTACT: &str = "contact";
    pub const EMAIL_TEMPLATE: &str = "email_template";
    pub const BADGE: &str = "badge";
    pub const REFERRAL: &str = "referral";
    pub const ACTIVITY_LOG: &str = "activity_log";
}

/// Category used to color and filter entries in the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Create,
    Update,
    Delete,
    Other,
}

impl ActionCategory {
    pub fn color(self) -> &'static str {
        match self {
            ActionCategory::Create => "green",
            ActionCategory::Update => "blue",
            ActionCategory::Delete => "red",
            ActionCategory::Other => "gray",
        }
    }
}

/// Category inferred from the action prefix.
pub fn action_category(action_type: &str) -> ActionCategory {
    if action_type.starts_with("create_") || action_type.starts_with("award_") {
        ActionCategory::Create
    } else if action_type.starts_with("update_") {
        ActionCategory::Update
    } else if action_type.starts_with("delete_") {
        ActionCategory::Delete
    } else {
        ActionCategory::Other
    }
}

/// French label for an action type. Unknown actions get a generic label.
pub fn action_label(action_type: &str) -> &'static str {
    use action_types::*;
    match action_type {
        CREATE_FORMATION => "Création de formation",
        UPDATE_FORMATION => "Modification de formation",
        DELETE_FORMATION => "Suppression de formation",
        CREATE_SESSION => "Ajout de session",
        UPDATE_SESSION => "Modification de session",
        DELETE_SESSION => "Suppression de session",
        UPDATE_CONTACT_STATUS => "Changement de statut de contact",
        DELETE_CONTACT => "Suppression de contact",
        CREATE_EMAIL_TEMPLATE => "Création de modèle d'email",
        UPDATE_EMAIL_TEMPLATE => "Modification de modèle d'email",
        DELETE_EMAIL_TEMPLATE => "Suppression de modèle d'email",
        CREATE_BADGE => "Création de badge",
        AWARD_BADGE => "Attribution de badge",
        UPDATE_REFERRAL_STATUS => "Changement de statut de parrainage",
        EXPORT => "Export",
        _ => "Autre action",
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Keys whose values never reach the activity log.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "secret", "authorization"];

/// Replace sensitive values (matched by key substring, any depth) with
/// `"[REDACTED]"`.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    let val = if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        serde_json::Value::String("[REDACTED]".to_string())
                    } else {
                        redact_sensitive_fields(val)
                    };
                    (key.clone(), val)
                })
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
