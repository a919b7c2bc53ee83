//! Delivery channel for outgoing email.

pub mod email;

use async_trait::async_trait;

use self::email::EmailError;

/// A fully rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    /// Bodies starting with a tag are sent as HTML, everything else as plain text.
    pub fn is_html(&self) -> bool {
        self.body.trim_start().starts_with('<')
    }
}

/// Sends one email. Implemented over SMTP in production and by recording
/// doubles in tests.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}
