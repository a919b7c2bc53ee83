//! Badge catalogue, awarded badges, and the admin badge filter.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::badge::{BadgeCategory, BadgeRarity};
use masterclass_core::export::Tabular;
use masterclass_core::filtering::{Filter, TextQuery};
use masterclass_core::gamification::BadgeTally;
use masterclass_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Badge entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Badge {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rarity: String,
    pub points: i32,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBadge {
    #[validate(length(min = 1, max = 100, message = "Badge name must be between 1 and 100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    pub category: BadgeCategory,
    pub rarity: Option<BadgeRarity>,
    #[validate(range(min = 0, message = "Badge points must be non-negative"))]
    pub points: i32,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBadge {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<BadgeCategory>,
    pub rarity: Option<BadgeRarity>,
    #[validate(range(min = 0))]
    pub points: Option<i32>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

/// Badge with the number of members who earned it (admin list and export).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BadgeWithAwards {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub badge: Badge,
    pub awarded_count: i64,
}

impl Tabular for BadgeWithAwards {
    fn headers() -> &'static [&'static str] {
        &["ID", "Nom", "Catégorie", "Rareté", "Points", "Actif", "Attributions"]
    }

    fn cells(&self) -> Vec<String> {
        let b = &self.badge;
        vec![
            b.id.to_string(),
            b.name.clone(),
            b.category
                .parse::<BadgeCategory>()
                .map(|c| c.label().to_string())
                .unwrap_or_else(|_| b.category.clone()),
            b.rarity
                .parse::<BadgeRarity>()
                .map(|r| r.label().to_string())
                .unwrap_or_else(|_| b.rarity.clone()),
            b.points.to_string(),
            if b.is_active { "oui" } else { "non" }.to_string(),
            self.awarded_count.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Member view
// ---------------------------------------------------------------------------

/// A catalogue badge as seen by one member: `earned_at` is set once earned.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberBadge {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: Option<Timestamp>,
}

impl MemberBadge {
    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }

    /// Minimal view for collection statistics. Rows with an unknown
    /// category are skipped.
    pub fn tally(&self) -> Option<BadgeTally> {
        let category = self.badge.category.parse::<BadgeCategory>().ok()?;
        Some(BadgeTally {
            category,
            points: self.badge.points,
            earned: self.is_earned(),
        })
    }
}

/// A row of the `user_badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadge {
    pub id: DbId,
    pub user_id: DbId,
    pub badge_id: DbId,
    pub awarded_by: Option<DbId>,
    pub earned_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of the admin "award badge" action.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardBadge {
    pub user_id: DbId,
}

/// Outcome of an award: `newly_awarded` is false when the member already
/// held the badge (no points are credited twice).
#[derive(Debug, Clone, Serialize)]
pub struct AwardOutcome {
    pub user_badge: UserBadge,
    pub newly_awarded: bool,
}

// ---------------------------------------------------------------------------
// Admin filter
// ---------------------------------------------------------------------------

/// Page-local filter for the admin badge list.
#[derive(Debug, Clone, Default)]
pub struct BadgeFilter {
    pub query: TextQuery,
    pub category: Option<BadgeCategory>,
    pub rarity: Option<BadgeRarity>,
    pub is_active: Option<bool>,
}

impl BadgeFilter {
    pub fn apply(&self, rows: Vec<BadgeWithAwards>) -> Vec<BadgeWithAwards> {
        Filter::new()
            .with_text(&self.query, |r: &BadgeWithAwards| {
                vec![r.badge.name.as_str(), r.badge.description.as_str()]
            })
            .with_str_eq(self.category.map(|c| c.as_str()), |r: &BadgeWithAwards| {
                r.badge.category.as_str()
            })
            .with_str_eq(self.rarity.map(|r| r.as_str()), |r: &BadgeWithAwards| {
                r.badge.rarity.as_str()
            })
            .with_eq(self.is_active, |r: &BadgeWithAwards| r.badge.is_active)
            .apply(rows)
    }
}
