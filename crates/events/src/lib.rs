//! Masterclass ONM outgoing email.
//!
//! - [`delivery`]: the [`Mailer`] abstraction and its SMTP implementation.
//! - [`queue`]: enqueueing auto-send template emails from request handlers.
//! - [`EmailScheduler`]: background task that sends due queued emails.

pub mod delivery;
pub mod queue;
pub mod scheduler;

pub use delivery::email::{EmailConfig, EmailError, SmtpMailer};
pub use delivery::{Mailer, OutgoingEmail};
pub use queue::queue_template_email;
pub use scheduler::{EmailScheduler, SchedulerConfig, TickSummary};
