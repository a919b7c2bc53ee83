//! Badge categories and rarities.
//!
//! Icon names refer to the icon set bundled with the front-end; colors are
//! design-token names, not raw CSS.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Thematic family a badge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Formation,
    Participation,
    Communaute,
    Parrainage,
    Expertise,
    Special,
}

impl BadgeCategory {
    pub const ALL: [BadgeCategory; 6] = [
        BadgeCategory::Formation,
        BadgeCategory::Participation,
        BadgeCategory::Communaute,
        BadgeCategory::Parrainage,
        BadgeCategory::Expertise,
        BadgeCategory::Special,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeCategory::Formation => "formation",
            BadgeCategory::Participation => "participation",
            BadgeCategory::Communaute => "communaute",
            BadgeCategory::Parrainage => "parrainage",
            BadgeCategory::Expertise => "expertise",
            BadgeCategory::Special => "special",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BadgeCategory::Formation => "Formation",
            BadgeCategory::Participation => "Participation",
            BadgeCategory::Communaute => "Communauté",
            BadgeCategory::Parrainage => "Parrainage",
            BadgeCategory::Expertise => "Expertise",
            BadgeCategory::Special => "Spécial",
        }
    }

    /// Default icon used when a badge row carries no icon of its own.
    pub fn icon(self) -> &'static str {
        match self {
            BadgeCategory::Formation => "graduation-cap",
            BadgeCategory::Participation => "calendar-check",
            BadgeCategory::Communaute => "users",
            BadgeCategory::Parrainage => "handshake",
            BadgeCategory::Expertise => "award",
            BadgeCategory::Special => "star",
        }
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!("Invalid badge category '{s}'"))
            })
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// How hard a badge is to obtain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    pub const ALL: [BadgeRarity; 4] = [
        BadgeRarity::Common,
        BadgeRarity::Rare,
        BadgeRarity::Epic,
        BadgeRarity::Legendary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeRarity::Common => "common",
            BadgeRarity::Rare => "rare",
            BadgeRarity::Epic => "epic",
            BadgeRarity::Legendary => "legendary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BadgeRarity::Common => "Commun",
            BadgeRarity::Rare => "Rare",
            BadgeRarity::Epic => "Épique",
            BadgeRarity::Legendary => "Légendaire",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BadgeRarity::Common => "gray",
            BadgeRarity::Rare => "blue",
            BadgeRarity::Epic => "purple",
            BadgeRarity::Legendary => "amber",
        }
    }
}

impl fmt::Display for BadgeRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeRarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeRarity::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid badge rarity '{s}'")))
    }
}

/// Validate the point value attached to a badge.
pub fn validate_badge_points(points: i32) -> Result<(), CoreError> {
    if points < 0 {
        return Err(CoreError::Validation(
            "Badge points must be non-negative".to_string(),
        ));
    }
    Ok(())
}
