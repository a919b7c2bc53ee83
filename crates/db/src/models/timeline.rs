//! Member timeline events.

use serde::Serialize;
use sqlx::FromRow;

use masterclass_core::timeline::{Dated, TimelineEventKind};
use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimelineEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub occurred_at: Timestamp,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Dated for TimelineEvent {
    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }
}

/// Timeline entry enriched with display lookups. Unknown kinds are
/// normalized to `event`.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub event: TimelineEvent,
    pub icon: &'static str,
    pub color: &'static str,
}

impl From<TimelineEvent> for TimelineEntry {
    fn from(mut event: TimelineEvent) -> Self {
        let kind = TimelineEventKind::parse_lenient(&event.kind);
        event.kind = kind.as_str().to_string();
        Self {
            event,
            icon: kind.icon(),
            color: kind.color(),
        }
    }
}

impl Dated for TimelineEntry {
    fn occurred_at(&self) -> Timestamp {
        self.event.occurred_at
    }
}

#[derive(Debug, Clone)]
pub struct CreateTimelineEvent {
    pub user_id: DbId,
    pub kind: TimelineEventKind,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to now.
    pub occurred_at: Option<Timestamp>,
    pub metadata: Option<serde_json::Value>,
}
