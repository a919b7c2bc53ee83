//! Formation catalogue, scheduled sessions, and the admin formation filter.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::filtering::{Filter, TextQuery};
use masterclass_core::formation::FormationLevel;
use masterclass_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Formation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Formation {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub level: String,
    pub price_cents: i64,
    pub duration_hours: i32,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFormation {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub level: FormationLevel,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 1))]
    pub duration_hours: i32,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFormation {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub level: Option<FormationLevel>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 1))]
    pub duration_hours: Option<i32>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

/// Formation with its sessions embedded, ordered by start date.
#[derive(Debug, Clone, Serialize)]
pub struct FormationWithSessions {
    #[serde(flatten)]
    pub formation: Formation,
    pub sessions: Vec<FormationSession>,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormationSession {
    pub id: DbId,
    pub formation_id: DbId,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub location: String,
    pub capacity: i32,
    pub seats_taken: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFormationSession {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFormationSession {
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub seats_taken: Option<i32>,
}

// ---------------------------------------------------------------------------
// Admin filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FormationFilter {
    pub query: TextQuery,
    pub level: Option<FormationLevel>,
    pub is_published: Option<bool>,
}

impl FormationFilter {
    pub fn apply(&self, rows: Vec<Formation>) -> Vec<Formation> {
        Filter::new()
            .with_text(&self.query, |f: &Formation| {
                vec![f.title.as_str(), f.slug.as_str(), f.description.as_str()]
            })
            .with_str_eq(self.level.map(|l| l.as_str()), |f: &Formation| f.level.as_str())
            .with_eq(self.is_published, |f: &Formation| f.is_published)
            .apply(rows)
    }
}
