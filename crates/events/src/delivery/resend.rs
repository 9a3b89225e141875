//! Resend HTTP API provider.
//!
//! Sends notification emails with `POST /emails` and looks up inbound
//! (received) emails with `GET /emails/receiving/{id}`, both authenticated
//! with a bearer API key.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DeliveryError, InboundMessage, MessageId, MessagingProvider, OutboundMessage};

const DEFAULT_API_URL: &str = "https://api.resend.com";

const DEFAULT_FROM_ADDRESS: &str = "Signals <signals@updates.signals.dev>";

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub from_address: String,
    pub api_url: String,
}

impl ResendConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `RESEND_API_KEY` is not set or empty.
    ///
    /// | Variable         | Required | Default                                  |
    /// |------------------|----------|------------------------------------------|
    /// | `RESEND_API_KEY` | yes      | -                                         |
    /// | `RESEND_FROM`    | no       | `Signals <signals@updates.signals.dev>`  |
    /// | `RESEND_API_URL` | no       | `https://api.resend.com`                 |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("RESEND_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            from_address: std::env::var("RESEND_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            api_url: std::env::var("RESEND_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ReceivedEmail {
    id: String,
    from: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    html: Option<String>,
}

impl From<ReceivedEmail> for InboundMessage {
    fn from(email: ReceivedEmail) -> Self {
        Self {
            id: email.id,
            from: email.from,
            subject: email.subject.unwrap_or_default(),
            text: email.text.or(email.html).unwrap_or_default(),
        }
    }
}

pub struct ResendProvider {
    client: reqwest::Client,
    config: ResendConfig,
}

impl ResendProvider {
    pub fn new(config: ResendConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Ensure the response has a success status code, otherwise capture the
    /// status and body text in a [`DeliveryError::Provider`].
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DeliveryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MessagingProvider for ResendProvider {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, DeliveryError> {
        let body = serde_json::json!({
            "from": self.config.from_address,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
        });

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let sent: SendResponse = Self::ensure_success(response).await?.json().await?;
        tracing::info!(to = %message.to, message_id = %sent.id, "Notification email sent via Resend");
        Ok(sent.id)
    }

    async fn fetch_inbound(&self, message_id: &str) -> Result<InboundMessage, DeliveryError> {
        let response = self
            .client
            .get(format!("{}/emails/receiving/{}", self.config.api_url, message_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let email: ReceivedEmail = Self::ensure_success(response).await?.json().await?;
        Ok(email.into())
    }
}
