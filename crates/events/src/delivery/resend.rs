//! Email delivery through the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;

use crate::delivery::Mailer;
use crate::error::NotifyError;
use crate::triggers::Notification;

/// Resend's send-email endpoint.
pub const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each message as JSON to Resend, authenticated with an API key.
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_address: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from_address: String) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: RESEND_API_URL.to_string(),
            api_key,
            from_address,
        })
    }

    /// Send to a different endpoint (a local mock, a proxy).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, to: &str, notification: &Notification) -> serde_json::Value {
        serde_json::json!({
            "from": self.from_address,
            "to": [to],
            "subject": notification.subject,
            "html": notification.html,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(to, notification))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }
        tracing::debug!(to, "Resend accepted message");
        Ok(())
    }
}
