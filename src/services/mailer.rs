use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MailSettings;

/// Errors that can occur when handing a message to the mail relay
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Mail relay rejected message: {0}")]
    Rejected(String),

    #[error("Mail relay endpoint is not configured")]
    NotConfigured,
}

/// Outgoing email
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivers a single message, reporting success or failure
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Mail transport posting JSON to an HTTP relay
pub struct HttpMailer {
    endpoint: String,
    api_key: String,
    from: String,
    client: Client,
}

impl HttpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: settings.endpoint.trim().to_string(),
            api_key: settings.api_key.clone(),
            from: settings.from.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if !self.is_configured() {
            return Err(MailError::NotConfigured);
        }

        let payload = RelayPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{} {}", status, body)));
        }

        tracing::debug!("Mail relay accepted message to {}", message.to);

        Ok(())
    }
}
