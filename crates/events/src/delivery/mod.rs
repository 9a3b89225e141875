//! External delivery channels for notification emails.
//!
//! Every channel implements [`MessagingProvider`]. The dispatcher only sees
//! the trait, so tests and local development can swap in the in-memory
//! [`outbox::OutboxProvider`].

pub mod email;
pub mod outbox;
pub mod resend;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for messaging provider failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The HTTP request to the provider failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status code.
    #[error("Messaging provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    /// The provider cannot perform the requested operation.
    #[error("Operation not supported by the {0} provider")]
    Unsupported(&'static str),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Provider-assigned identifier of a sent message.
pub type MessageId = String;

/// A rendered notification ready to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// An email received by the provider on our inbound address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    /// Raw `From` header, e.g. `"Ada <ada@example.com>"`.
    pub from: String,
    pub subject: String,
    /// Plain-text body.
    pub text: String,
}

impl InboundMessage {
    /// Bare address extracted from the `From` header.
    pub fn sender_address(&self) -> &str {
        let from = self.from.trim();
        match (from.rfind('<'), from.rfind('>')) {
            (Some(start), Some(end)) if start < end => from[start + 1..end].trim(),
            _ => from,
        }
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Send one message. No retries.
    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, DeliveryError>;

    /// Fetch the full content of an inbound message by id.
    async fn fetch_inbound(&self, message_id: &str) -> Result<InboundMessage, DeliveryError> {
        let _ = message_id;
        Err(DeliveryError::Unsupported(self.name()))
    }
}

/// Pick a provider from the environment.
///
/// Resend wins when `RESEND_API_KEY` is set, then SMTP when `SMTP_HOST` is
/// set. Otherwise messages go to an in-memory outbox and are only logged.
pub fn provider_from_env() -> Result<Arc<dyn MessagingProvider>, DeliveryError> {
    if let Some(config) = resend::ResendConfig::from_env() {
        tracing::info!(api_url = %config.api_url, "Using Resend messaging provider");
        return Ok(Arc::new(resend::ResendProvider::new(config)?));
    }
    if let Some(config) = email::EmailConfig::from_env() {
        tracing::info!(smtp_host = %config.smtp_host, "Using SMTP messaging provider");
        return Ok(Arc::new(email::SmtpProvider::new(config)));
    }
    tracing::warn!("No messaging provider configured, notifications go to the in-memory outbox");
    Ok(Arc::new(outbox::OutboxProvider::default()))
}
