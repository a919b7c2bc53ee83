//! Contact requests from the public form and the admin contact filter.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use masterclass_core::contact::ContactStatus;
use masterclass_core::filtering::{DateRange, Filter, TextQuery};
use masterclass_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub formation_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public contact form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    pub formation_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContactStatus {
    pub status: ContactStatus,
}

/// Page-local filter for the admin contact list.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub query: TextQuery,
    pub status: Option<ContactStatus>,
    pub range: DateRange,
}

impl ContactFilter {
    /// Keep contacts matching every active criterion. The text query looks
    /// at name, email and subject.
    pub fn apply(&self, rows: Vec<Contact>) -> Vec<Contact> {
        Filter::new()
            .with_text(&self.query, |c: &Contact| {
                vec![c.name.as_str(), c.email.as_str(), c.subject.as_str()]
            })
            .with_str_eq(self.status.map(|s| s.as_str()), |c: &Contact| c.status.as_str())
            .with_date_range(self.range, |c: &Contact| c.created_at)
            .apply(rows)
    }
}
