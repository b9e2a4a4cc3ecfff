//! Idea board notifications.
//!
//! - [`triggers`]: compose the email for a new idea, a new note or a new
//!   bug report from the documents a write produced.
//! - [`TriggerDispatcher`]: background service that follows the store's
//!   change feed and fires the matching trigger.
//! - [`delivery`]: the [`Notifier`] and its mail channels (Resend over
//!   HTTP, SMTP).

pub mod compose;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod triggers;

pub use delivery::email::{SmtpConfig, SmtpMailer};
pub use delivery::resend::ResendMailer;
pub use delivery::{Mailer, Notifier, NotifierConfig};
pub use dispatcher::TriggerDispatcher;
pub use error::NotifyError;
pub use triggers::Notification;
