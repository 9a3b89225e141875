//! Email notification delivery via SMTP.
//!
//! [`SmtpProvider`] wraps the `lettre` async SMTP transport to send HTML
//! notification emails. Configuration is loaded from environment variables;
//! if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! SMTP provider should be constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, MessageId, MessagingProvider, OutboundMessage};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Signals <noreply@signals.local>";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                            |
    /// |-----------------|----------|------------------------------------|
    /// | `SMTP_HOST`     | yes      | -                                   |
    /// | `SMTP_PORT`     | no       | `587`                              |
    /// | `SMTP_FROM`     | no       | `Signals <noreply@signals.local>`  |
    /// | `SMTP_USER`     | no       | -                                   |
    /// | `SMTP_PASSWORD` | no       | -                                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// SmtpProvider
// ---------------------------------------------------------------------------

/// Sends notification emails through an SMTP relay.
///
/// Send-only: SMTP has no way to look up inbound messages, so
/// [`MessagingProvider::fetch_inbound`] keeps its `Unsupported` default.
pub struct SmtpProvider {
    config: EmailConfig,
}

impl SmtpProvider {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(
        &self,
        message: &OutboundMessage,
        message_id: &str,
    ) -> Result<Message, DeliveryError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(message.to.parse()?)
            .subject(message.subject.clone())
            .message_id(Some(message_id.to_string()))
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl MessagingProvider for SmtpProvider {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, DeliveryError> {
        let message_id = format!("<{}@signals.local>", uuid::Uuid::new_v4());
        let email = self.build_message(message, &message_id)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = %message.to, message_id = %message_id, "Notification email sent via SMTP");
        Ok(message_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
