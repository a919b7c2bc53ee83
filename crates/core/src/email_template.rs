//! Email template types and `{{ variable }}` rendering.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_TEMPLATE_NAME_LENGTH: usize = 200;
pub const MAX_TEMPLATE_SUBJECT_LENGTH: usize = 300;
pub const MAX_TEMPLATE_CONTENT_LENGTH: usize = 50_000;

/// Longest accepted auto-send delay: 30 days.
pub const MAX_SEND_DELAY_MINUTES: i32 = 30 * 24 * 60;

/// Matches `{{name}}`, tolerating whitespace inside the braces.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\s*\}\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Template type
// ---------------------------------------------------------------------------

/// Event an email template is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplateType {
    Welcome,
    ContactConfirmation,
    ReferralInvitation,
    FormationReminder,
    SatisfactionSurvey,
    BadgeEarned,
}

impl EmailTemplateType {
    pub const ALL: [EmailTemplateType; 6] = [
        EmailTemplateType::Welcome,
        EmailTemplateType::ContactConfirmation,
        EmailTemplateType::ReferralInvitation,
        EmailTemplateType::FormationReminder,
        EmailTemplateType::SatisfactionSurvey,
        EmailTemplateType::BadgeEarned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmailTemplateType::Welcome => "welcome",
            EmailTemplateType::ContactConfirmation => "contact_confirmation",
            EmailTemplateType::ReferralInvitation => "referral_invitation",
            EmailTemplateType::FormationReminder => "formation_reminder",
            EmailTemplateType::SatisfactionSurvey => "satisfaction_survey",
            EmailTemplateType::BadgeEarned => "badge_earned",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmailTemplateType::Welcome => "Bienvenue",
            EmailTemplateType::ContactConfirmation => "Confirmation de contact",
            EmailTemplateType::ReferralInvitation => "Invitation parrainage",
            EmailTemplateType::FormationReminder => "Rappel de formation",
            EmailTemplateType::SatisfactionSurvey => "Enquête de satisfaction",
            EmailTemplateType::BadgeEarned => "Badge obtenu",
        }
    }

    /// Variables the application supplies when sending this type.
    pub fn variables(self) -> &'static [&'static str] {
        match self {
            EmailTemplateType::Welcome => &["first_name", "last_name", "site_url"],
            EmailTemplateType::ContactConfirmation => &["name", "subject"],
            EmailTemplateType::ReferralInvitation => {
                &["referrer_name", "referee_name", "referral_code", "invite_url"]
            }
            EmailTemplateType::FormationReminder => {
                &["first_name", "formation_title", "session_date", "location"]
            }
            EmailTemplateType::SatisfactionSurvey => &["first_name", "formation_title", "survey_url"],
            EmailTemplateType::BadgeEarned => &["first_name", "badge_name", "badge_points"],
        }
    }
}

impl fmt::Display for EmailTemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailTemplateType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailTemplateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid email template type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Subject and body after substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub content: String,
    /// Placeholders that had no value and were left in place.
    pub missing: Vec<String>,
}

/// Replace every `{{ name }}` with its value from `vars`.
///
/// Unknown placeholders are left untouched so a preview shows what is
/// missing.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Render subject and content together.
pub fn render_email(subject: &str, content: &str, vars: &HashMap<String, String>) -> RenderedEmail {
    let missing = placeholders(subject, content)
        .into_iter()
        .filter(|name| !vars.contains_key(name))
        .collect();
    RenderedEmail {
        subject: render(subject, vars),
        content: render(content, vars),
        missing,
    }
}

/// Placeholder names used in subject and content, sorted and de-duplicated.
pub fn placeholders(subject: &str, content: &str) -> Vec<String> {
    let mut names: Vec<String> = [subject, content]
        .into_iter()
        .flat_map(|text| PLACEHOLDER_RE.captures_iter(text))
        .map(|caps| caps[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Turn a JSON object of variables into strings. Non-string scalars are
/// formatted; nulls, arrays and nested objects are skipped.
pub fn vars_from_json(value: &serde_json::Value) -> HashMap<String, String> {
    let Some(object) = value.as_object() else {
        return HashMap::new();
    };
    object
        .iter()
        .filter_map(|(key, v)| {
            let text = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_template(name: &str, subject: &str, content: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Template name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_TEMPLATE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Template name exceeds maximum length of {MAX_TEMPLATE_NAME_LENGTH} characters"
        )));
    }
    if subject.trim().is_empty() {
        return Err(CoreError::Validation("Template subject must not be empty".to_string()));
    }
    if subject.chars().count() > MAX_TEMPLATE_SUBJECT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Template subject exceeds maximum length of {MAX_TEMPLATE_SUBJECT_LENGTH} characters"
        )));
    }
    if content.chars().count() > MAX_TEMPLATE_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Template content exceeds maximum length of {MAX_TEMPLATE_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_send_delay(minutes: i32) -> Result<(), CoreError> {
    if !(0..=MAX_SEND_DELAY_MINUTES).contains(&minutes) {
        return Err(CoreError::Validation(format!(
            "Send delay must be between 0 and {MAX_SEND_DELAY_MINUTES} minutes (got {minutes})"
        )));
    }
    Ok(())
}
