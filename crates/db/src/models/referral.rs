//! Referral invitations and the admin referral filter.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::filtering::{DateRange, Filter, TextQuery};
use masterclass_core::referral::ReferralStatus;
use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Referral {
    pub id: DbId,
    pub referrer_id: DbId,
    pub referee_email: String,
    pub referee_name: Option<String>,
    pub referee_user_id: Option<DbId>,
    pub code: String,
    pub status: String,
    pub message: Option<String>,
    pub reward_points: i32,
    pub clicked_at: Option<Timestamp>,
    pub registered_at: Option<Timestamp>,
    pub converted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Referral {
    /// Parsed status; unknown values read as `pending`.
    pub fn status(&self) -> ReferralStatus {
        self.status.parse().unwrap_or(ReferralStatus::Pending)
    }
}

/// Member request to invite a colleague.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteReferral {
    #[validate(email(message = "Invalid email address"))]
    pub referee_email: String,
    #[validate(length(min = 1, max = 200))]
    pub referee_name: Option<String>,
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateReferral {
    pub referrer_id: DbId,
    pub referee_email: String,
    pub referee_name: Option<String>,
    pub code: String,
    pub message: Option<String>,
    pub status: ReferralStatus,
    pub referee_user_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReferralStatus {
    pub status: ReferralStatus,
}

/// Result of an admin status change.
#[derive(Debug, Clone)]
pub struct ReferralStatusChange {
    /// Row as it was before the change.
    pub previous: Referral,
    pub referral: Referral,
    /// Points posted to the referrer (negative when a reward is withdrawn).
    pub points_delta: i32,
}

/// Referral joined with the referrer's name for the admin list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReferralWithReferrer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub referral: Referral,
    pub referrer_name: String,
    pub referrer_email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReferralFilter {
    pub query: TextQuery,
    pub status: Option<ReferralStatus>,
    pub range: DateRange,
}

impl ReferralFilter {
    pub fn apply(&self, rows: Vec<ReferralWithReferrer>) -> Vec<ReferralWithReferrer> {
        Filter::new()
            .with_text(&self.query, |r: &ReferralWithReferrer| {
                vec![
                    r.referral.referee_email.as_str(),
                    r.referral.referee_name.as_deref().unwrap_or(""),
                    r.referral.code.as_str(),
                    r.referrer_name.as_str(),
                    r.referrer_email.as_str(),
                ]
            })
            .with_str_eq(self.status.map(|s| s.as_str()), |r: &ReferralWithReferrer| {
                r.referral.status.as_str()
            })
            .with_date_range(self.range, |r: &ReferralWithReferrer| r.referral.created_at)
            .apply(rows)
    }
}
