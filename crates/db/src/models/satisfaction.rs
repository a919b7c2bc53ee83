//! Satisfaction survey responses.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SatisfactionSurvey {
    pub id: DbId,
    pub formation_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub respondent_name: Option<String>,
    pub respondent_email: Option<String>,
    pub rating: i16,
    pub recommendation: Option<i16>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public survey submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSatisfactionSurvey {
    pub formation_id: Option<DbId>,
    #[validate(length(max = 200))]
    pub respondent_name: Option<String>,
    #[validate(email)]
    pub respondent_email: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(range(min = 0, max = 10))]
    pub recommendation: Option<i16>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
