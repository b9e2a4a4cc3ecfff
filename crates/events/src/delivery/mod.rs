//! Outbound email for notifications.
//!
//! [`Notifier`] is what the triggers talk to. It owns at most one
//! [`Mailer`] and one recipient address; when either is missing, or a send
//! fails, the failure is logged and dropped. Nothing here retries.

pub mod email;
pub mod resend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::triggers::Notification;

use self::email::{SmtpConfig, SmtpMailer};
use self::resend::ResendMailer;

/// Sender used when `NOTIFY_FROM` is not set.
pub const DEFAULT_FROM_ADDRESS: &str = "Idea Board <onboarding@resend.dev>";

/// Board link used when `BOARD_URL` is not set.
pub const DEFAULT_BOARD_URL: &str = "http://localhost:5173/";

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// A channel that can send one HTML email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// NotifierConfig
// ---------------------------------------------------------------------------

/// Notification settings.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub resend_api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub recipient: Option<String>,
    pub from_address: String,
    pub board_url: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            smtp: None,
            recipient: None,
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
            board_url: DEFAULT_BOARD_URL.to_string(),
        }
    }
}

impl NotifierConfig {
    /// Load from the environment. Never fails: missing settings only
    /// disable sending.
    ///
    /// | Variable         | Default                                |
    /// |------------------|----------------------------------------|
    /// | `RESEND_API_KEY` | unset                                  |
    /// | `NOTIFY_EMAIL`   | unset                                  |
    /// | `NOTIFY_FROM`    | `Idea Board <onboarding@resend.dev>`   |
    /// | `BOARD_URL`      | `http://localhost:5173/`               |
    /// | `SMTP_*`         | see [`SmtpConfig::from_env`]           |
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            resend_api_key: non_empty("RESEND_API_KEY"),
            smtp: SmtpConfig::from_env(),
            recipient: non_empty("NOTIFY_EMAIL"),
            from_address: non_empty("NOTIFY_FROM")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            board_url: non_empty("BOARD_URL").unwrap_or_else(|| DEFAULT_BOARD_URL.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sends notifications to the configured recipient, best effort.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
    recipient: Option<String>,
}

impl Notifier {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, recipient: Option<String>) -> Self {
        Self { mailer, recipient }
    }

    /// A notifier that never sends.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    /// Pick the mail channel from `config`: Resend when an API key is set,
    /// otherwise SMTP when a host is set, otherwise none.
    pub fn from_config(config: &NotifierConfig) -> Self {
        let mailer: Option<Arc<dyn Mailer>> = if let Some(key) = &config.resend_api_key {
            match ResendMailer::new(key.clone(), config.from_address.clone()) {
                Ok(mailer) => Some(Arc::new(mailer)),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Resend mailer");
                    None
                }
            }
        } else {
            config
                .smtp
                .clone()
                .map(|smtp| Arc::new(SmtpMailer::new(smtp, config.from_address.clone())) as Arc<dyn Mailer>)
        };

        if mailer.is_none() {
            tracing::warn!("No mail channel configured, notifications will be skipped");
        }
        if config.recipient.is_none() {
            tracing::warn!("NOTIFY_EMAIL not set, notifications will be skipped");
        }

        Self::new(mailer, config.recipient.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.mailer.is_some() && self.recipient.is_some()
    }

    /// Attempt one send and report the outcome.
    pub async fn try_notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or(NotifyError::ConfigurationMissing("mail channel"))?;
        let to = self
            .recipient
            .as_deref()
            .ok_or(NotifyError::ConfigurationMissing("recipient"))?;

        mailer.send(to, notification).await
    }

    /// Attempt one send; log the outcome and never fail.
    pub async fn notify(&self, notification: &Notification) {
        match self.try_notify(notification).await {
            Ok(()) => {
                tracing::info!(subject = %notification.subject, "Notification email sent");
            }
            Err(e @ NotifyError::ConfigurationMissing(_)) => {
                tracing::warn!(error = %e, subject = %notification.subject, "Notification skipped");
            }
            Err(e) => {
                tracing::error!(error = %e, subject = %notification.subject, "Failed to send notification");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for Recording {
        async fn send(&self, to: &str, n: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().await.push((to.to_string(), n.subject.clone()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Mailer for Failing {
        async fn send(&self, _to: &str, _n: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::HttpStatus(500))
        }
    }

    fn message() -> Notification {
        Notification {
            subject: "New Idea: x".into(),
            html: "<p>x</p>".into(),
        }
    }

    #[tokio::test]
    async fn sends_to_recipient() {
        let mailer = Arc::new(Recording::default());
        let notifier = Notifier::new(Some(mailer.clone()), Some("ops@example.com".into()));

        notifier.try_notify(&message()).await.unwrap();
        assert_eq!(
            *mailer.sent.lock().await,
            vec![("ops@example.com".to_string(), "New Idea: x".to_string())]
        );
    }

    #[tokio::test]
    async fn missing_pieces_are_configuration_errors() {
        let no_mailer = Notifier::new(None, Some("ops@example.com".into()));
        assert_matches!(
            no_mailer.try_notify(&message()).await,
            Err(NotifyError::ConfigurationMissing("mail channel"))
        );

        let no_recipient = Notifier::new(Some(Arc::new(Recording::default())), None);
        assert_matches!(
            no_recipient.try_notify(&message()).await,
            Err(NotifyError::ConfigurationMissing("recipient"))
        );
        assert!(!no_recipient.is_configured());
    }

    #[tokio::test]
    async fn notify_swallows_failures() {
        let notifier = Notifier::new(Some(Arc::new(Failing)), Some("ops@example.com".into()));
        notifier.notify(&message()).await;
        Notifier::disabled().notify(&message()).await;
    }

    #[test]
    fn from_config_without_channels_is_unconfigured() {
        let config = NotifierConfig {
            recipient: Some("ops@example.com".into()),
            ..Default::default()
        };
        assert!(!Notifier::from_config(&config).is_configured());
    }

    #[test]
    fn from_config_prefers_resend() {
        let config = NotifierConfig {
            resend_api_key: Some("re_test".into()),
            recipient: Some("ops@example.com".into()),
            ..Default::default()
        };
        assert!(Notifier::from_config(&config).is_configured());
    }
}
