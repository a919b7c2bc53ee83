//! Admin activity history rows and the history filter.

use serde::Serialize;
use sqlx::FromRow;

use masterclass_core::activity::{action_category, action_label};
use masterclass_core::export::Tabular;
use masterclass_core::filtering::{DateRange, Filter, TextQuery};
use masterclass_core::timeline::Dated;
use masterclass_core::types::{DbId, Timestamp};

/// Append-only activity entry, joined with the admin's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub admin_id: Option<DbId>,
    pub admin_name: Option<String>,
    pub action_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

impl Dated for ActivityLog {
    fn occurred_at(&self) -> Timestamp {
        self.created_at
    }
}

impl Tabular for ActivityLog {
    fn headers() -> &'static [&'static str] {
        &["Date", "Administrateur", "Action", "Entité", "ID entité", "Détails"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.admin_name.clone().unwrap_or_default(),
            action_label(&self.action_type).to_string(),
            self.entity_type.clone().unwrap_or_default(),
            self.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            self.details
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Activity entry with display lookups for the history view.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogEntry {
    #[serde(flatten)]
    pub log: ActivityLog,
    pub label: &'static str,
    pub color: &'static str,
}

impl From<ActivityLog> for ActivityLogEntry {
    fn from(log: ActivityLog) -> Self {
        Self {
            label: action_label(&log.action_type),
            color: action_category(&log.action_type).color(),
            log,
        }
    }
}

impl Dated for ActivityLogEntry {
    fn occurred_at(&self) -> Timestamp {
        self.log.created_at
    }
}

#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub admin_id: Option<DbId>,
    pub action_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLogFilter {
    pub query: TextQuery,
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub admin_id: Option<DbId>,
    pub range: DateRange,
}

impl ActivityLogFilter {
    pub fn apply(&self, rows: Vec<ActivityLog>) -> Vec<ActivityLog> {
        Filter::new()
            .with_text(&self.query, |l: &ActivityLog| {
                vec![
                    l.action_type.as_str(),
                    action_label(&l.action_type),
                    l.admin_name.as_deref().unwrap_or(""),
                    l.entity_type.as_deref().unwrap_or(""),
                ]
            })
            .with_str_eq(self.action_type.as_deref(), |l: &ActivityLog| l.action_type.as_str())
            .with_str_eq(self.entity_type.as_deref(), |l: &ActivityLog| {
                l.entity_type.as_deref().unwrap_or("")
            })
            .with_eq(self.admin_id, |l: &ActivityLog| l.admin_id.unwrap_or_default())
            .with_date_range(self.range, |l: &ActivityLog| l.created_at)
            .apply(rows)
    }
}
