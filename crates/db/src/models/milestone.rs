//! Learning-path milestones.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::gamification::MilestoneSpec;
use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LearningMilestone {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub position: i32,
    pub points_required: i64,
    pub icon: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LearningMilestone {
    pub fn spec(&self) -> MilestoneSpec {
        MilestoneSpec {
            id: self.id,
            position: self.position,
            points_required: self.points_required,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub position: i32,
    #[validate(range(min = 0))]
    pub points_required: i64,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMilestone {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
    #[validate(range(min = 0))]
    pub points_required: Option<i64>,
    pub icon: Option<String>,
}
