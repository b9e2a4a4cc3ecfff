//! Notification delivery errors.
//!
//! These never leave the notification layer: [`Notifier`](crate::Notifier)
//! logs them and carries on.

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// No mail channel or no recipient is configured.
    #[error("Notification not configured: {0}")]
    ConfigurationMissing(&'static str),

    /// The HTTP request to the mail API failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The mail API answered with a non-2xx status.
    #[error("Mail API returned HTTP {0}")]
    HttpStatus(u16),

    /// SMTP transport failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}
