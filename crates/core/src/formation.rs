//! Formation levels and catalogue validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MAX_TITLE_LENGTH: usize = 200;

/// Highest accepted price, in euro cents.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Target audience level of a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationLevel {
    Debutant,
    Intermediaire,
    Avance,
    Expert,
}

impl FormationLevel {
    pub const ALL: [FormationLevel; 4] = [
        FormationLevel::Debutant,
        FormationLevel::Intermediaire,
        FormationLevel::Avance,
        FormationLevel::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormationLevel::Debutant => "debutant",
            FormationLevel::Intermediaire => "intermediaire",
            FormationLevel::Avance => "avance",
            FormationLevel::Expert => "expert",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormationLevel::Debutant => "Débutant",
            FormationLevel::Intermediaire => "Intermédiaire",
            FormationLevel::Avance => "Avancé",
            FormationLevel::Expert => "Expert",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FormationLevel::Debutant => "green",
            FormationLevel::Intermediaire => "blue",
            FormationLevel::Avance => "purple",
            FormationLevel::Expert => "red",
        }
    }
}

impl fmt::Display for FormationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormationLevel {
    type Err = CoreError;

    /// Accepts the stored form and the accented label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debutant" | "débutant" => Ok(FormationLevel::Debutant),
            "intermediaire" | "intermédiaire" => Ok(FormationLevel::Intermediaire),
            "avance" | "avancé" => Ok(FormationLevel::Avance),
            "expert" => Ok(FormationLevel::Expert),
            other => Err(CoreError::Validation(format!(
                "Invalid formation level '{other}'. Must be one of: debutant, intermediaire, avance, expert"
            ))),
        }
    }
}

pub fn validate_formation(title: &str, price_cents: i64, duration_hours: i32) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Formation title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Formation title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(CoreError::Validation(format!(
            "Price must be between 0 and {MAX_PRICE_CENTS} cents (got {price_cents})"
        )));
    }
    if duration_hours <= 0 {
        return Err(CoreError::Validation(
            "Duration must be a positive number of hours".to_string(),
        ));
    }
    Ok(())
}

/// A session must end after it starts and offer at least one seat.
pub fn validate_session(starts_at: Timestamp, ends_at: Timestamp, capacity: i32) -> Result<(), CoreError> {
    if ends_at <= starts_at {
        return Err(CoreError::Validation(
            "Session end must be after its start".to_string(),
        ));
    }
    if capacity < 1 {
        return Err(CoreError::Validation(
            "Session capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Format a price in cents as euros, French style: `1 290,00 €`.
pub fn format_price_eur(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let euros = (cents / 100).to_string();
    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, ch) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped},{:02}\u{a0}€", cents % 100)
}
