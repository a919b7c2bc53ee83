//! Back-office notification kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Contact,
    Referral,
    Satisfaction,
    System,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::Contact,
        NotificationKind::Referral,
        NotificationKind::Satisfaction,
        NotificationKind::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Contact => "contact",
            NotificationKind::Referral => "referral",
            NotificationKind::Satisfaction => "satisfaction",
            NotificationKind::System => "system",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Contact => "mail",
            NotificationKind::Referral => "user-plus",
            NotificationKind::Satisfaction => "star",
            NotificationKind::System => "bell",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid notification kind '{s}'")))
    }
}
