//! Referral statuses, codes and share links.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::CoreError;

/// Length of a referral code.
pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Points credited to the referrer when a referral converts.
pub const REFERRAL_CONVERSION_POINTS: i32 = 100;

/// Points credited to the referrer when the referee registers.
pub const REFERRAL_REGISTRATION_POINTS: i32 = 25;

/// LinkedIn "share offsite" endpoint.
pub const LINKEDIN_SHARE_ENDPOINT: &str = "https://www.linkedin.com/sharing/share-offsite/";

/// Path of the public registration page that accepts a `ref` parameter.
pub const INVITE_PATH: &str = "/inscription";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Clicked,
    Registered,
    Converted,
    Expired,
}

impl ReferralStatus {
    pub const ALL: [ReferralStatus; 5] = [
        ReferralStatus::Pending,
        ReferralStatus::Clicked,
        ReferralStatus::Registered,
        ReferralStatus::Converted,
        ReferralStatus::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Clicked => "clicked",
            ReferralStatus::Registered => "registered",
            ReferralStatus::Converted => "converted",
            ReferralStatus::Expired => "expired",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "En attente",
            ReferralStatus::Clicked => "Lien ouvert",
            ReferralStatus::Registered => "Inscrit",
            ReferralStatus::Converted => "Converti",
            ReferralStatus::Expired => "Expiré",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "gray",
            ReferralStatus::Clicked => "blue",
            ReferralStatus::Registered => "yellow",
            ReferralStatus::Converted => "green",
            ReferralStatus::Expired => "red",
        }
    }

    /// Points the referrer earns when a referral enters this status.
    pub fn reward_points(self) -> i32 {
        match self {
            ReferralStatus::Registered => REFERRAL_REGISTRATION_POINTS,
            ReferralStatus::Converted => REFERRAL_CONVERSION_POINTS,
            ReferralStatus::Pending | ReferralStatus::Clicked | ReferralStatus::Expired => 0,
        }
    }
}

/// Total points a referral in `status` has earned its referrer so far.
///
/// A converted referral went through registration first, so it carries both
/// rewards.
pub fn cumulative_reward_points(status: ReferralStatus) -> i32 {
    match status {
        ReferralStatus::Converted => REFERRAL_REGISTRATION_POINTS + REFERRAL_CONVERSION_POINTS,
        other => other.reward_points(),
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferralStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferralStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim())
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid referral status '{s}'. Must be one of: pending, clicked, registered, converted, expired"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Derive a referral code from a UUID: the first eight hex digits, uppercased.
pub fn code_from_uuid(id: Uuid) -> String {
    id.simple()
        .to_string()
        .chars()
        .take(REFERRAL_CODE_LENGTH)
        .collect::<String>()
        .to_uppercase()
}

/// Fresh random referral code.
pub fn generate_code() -> String {
    code_from_uuid(Uuid::new_v4())
}

/// Normalize user input (trim, uppercase) and check the code's shape.
pub fn normalize_code(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim().to_uppercase();
    let valid = code.len() == REFERRAL_CODE_LENGTH
        && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !valid {
        return Err(CoreError::Validation(format!("Invalid referral code '{raw}'")));
    }
    Ok(code)
}

// ---------------------------------------------------------------------------
// Share links
// ---------------------------------------------------------------------------

/// Registration link carrying the referral code.
pub fn invite_url(site_url: &str, code: &str) -> Result<String, CoreError> {
    let base = format!("{}{INVITE_PATH}", site_url.trim_end_matches('/'));
    Url::parse_with_params(&base, &[("ref", code)])
        .map(String::from)
        .map_err(|e| CoreError::Internal(format!("Invalid site URL '{site_url}': {e}")))
}

/// LinkedIn share link for an arbitrary page.
pub fn linkedin_share_url(target: &str) -> Result<String, CoreError> {
    Url::parse_with_params(LINKEDIN_SHARE_ENDPOINT, &[("url", target)])
        .map(String::from)
        .map_err(|e| CoreError::Internal(format!("Failed to build share URL: {e}")))
}

/// Links shown on the member "share" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub code: String,
    pub invite_url: String,
    pub linkedin_url: String,
}

impl ShareLinks {
    pub fn build(site_url: &str, code: &str) -> Result<Self, CoreError> {
        let invite = invite_url(site_url, code)?;
        let linkedin = linkedin_share_url(&invite)?;
        Ok(Self {
            code: code.to_string(),
            invite_url: invite,
            linkedin_url: linkedin,
        })
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregates shown above a member's referral list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferralSummary {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub converted: i64,
    pub conversion_percent: i64,
    pub points_earned: i64,
}

pub fn summarize<I>(statuses: I) -> ReferralSummary
where
    I: IntoIterator<Item = ReferralStatus>,
{
    let mut summary = ReferralSummary::default();
    for status in statuses {
        summary.total += 1;
        *summary.by_status.entry(status.as_str().to_string()).or_default() += 1;
        summary.points_earned += i64::from(cumulative_reward_points(status));
        if status == ReferralStatus::Converted {
            summary.converted += 1;
        }
    }
    if summary.total > 0 {
        summary.conversion_percent = summary.converted * 100 / summary.total;
    }
    summary
}
