//! Contact request statuses and form validation.
//!
//! Contacts arrive through the public contact form and are triaged by admins.
//! Any status can move to any other status; there is no transition table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum accepted length of a contact message body.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Maximum accepted length of a contact subject line.
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Triage status of a contact request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Nouveau,
    Lu,
    Traite,
    Archive,
}

impl ContactStatus {
    /// All statuses in triage order.
    pub const ALL: [ContactStatus; 4] = [
        ContactStatus::Nouveau,
        ContactStatus::Lu,
        ContactStatus::Traite,
        ContactStatus::Archive,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Nouveau => "nouveau",
            ContactStatus::Lu => "lu",
            ContactStatus::Traite => "traite",
            ContactStatus::Archive => "archive",
        }
    }

    /// Human-readable French label shown in the back-office.
    pub fn label(self) -> &'static str {
        match self {
            ContactStatus::Nouveau => "Nouveau",
            ContactStatus::Lu => "Lu",
            ContactStatus::Traite => "Traité",
            ContactStatus::Archive => "Archivé",
        }
    }

    /// Badge color token used by the admin list.
    pub fn color(self) -> &'static str {
        match self {
            ContactStatus::Nouveau => "blue",
            ContactStatus::Lu => "yellow",
            ContactStatus::Traite => "green",
            ContactStatus::Archive => "gray",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = CoreError;

    /// Accepts the stored form as well as the accented labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nouveau" => Ok(ContactStatus::Nouveau),
            "lu" => Ok(ContactStatus::Lu),
            "traite" | "traité" => Ok(ContactStatus::Traite),
            "archive" | "archivé" => Ok(ContactStatus::Archive),
            other => Err(CoreError::Validation(format!(
                "Invalid contact status '{other}'. Must be one of: nouveau, lu, traite, archive"
            ))),
        }
    }
}

/// Validate the free-text parts of a contact form submission.
///
/// Email syntax is checked by the DTO validator; this covers the parts that
/// depend on domain limits.
pub fn validate_contact_message(subject: &str, message: &str) -> Result<(), CoreError> {
    if subject.trim().is_empty() {
        return Err(CoreError::Validation("Subject must not be empty".into()));
    }
    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Subject must be at most {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    if message.trim().is_empty() {
        return Err(CoreError::Validation("Message must not be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_stored_and_accented_forms() {
        assert_eq!("traite".parse::<ContactStatus>().unwrap(), ContactStatus::Traite);
        assert_eq!("Traité".parse::<ContactStatus>().unwrap(), ContactStatus::Traite);
        assert_eq!("archivé".parse::<ContactStatus>().unwrap(), ContactStatus::Archive);
        assert_eq!(" NOUVEAU ".parse::<ContactStatus>().unwrap(), ContactStatus::Nouveau);
    }

    #[test]
    fn rejects_unknown_status() {
        assert_matches!("closed".parse::<ContactStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn as_str_round_trips_for_every_status() {
        for status in ContactStatus::ALL {
            assert_eq!(status.as_str().parse::<ContactStatus>().unwrap(), status);
        }
    }

    #[test]
    fn serde_uses_stored_form() {
        let json = serde_json::to_string(&ContactStatus::Traite).unwrap();
        assert_eq!(json, "\"traite\"");
    }

    #[test]
    fn labels_carry_accents() {
        assert_eq!(ContactStatus::Traite.label(), "Traité");
        assert_eq!(ContactStatus::Archive.label(), "Archivé");
    }

    #[test]
    fn empty_subject_rejected() {
        assert_matches!(
            validate_contact_message("  ", "hello"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn oversized_message_rejected() {
        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(validate_contact_message("Question", &long).is_err());
    }

    #[test]
    fn valid_message_accepted() {
        assert!(validate_contact_message("Inscription", "Bonjour, je souhaite m'inscrire.").is_ok());
    }
}
