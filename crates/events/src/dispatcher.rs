//! Notification dispatcher.
//!
//! Looks jobs up in the [`JobRegistry`], renders the matching template and
//! hands the result to the configured [`MessagingProvider`]. One call sends
//! exactly one message: no deduplication, no retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use signals_core::digest::ReportDigest;
use signals_core::registry::JobRegistry;
use signals_core::stage::Stage;
use signals_core::types::JobId;
use signals_core::verdict::Verdict;

use crate::delivery::{DeliveryError, MessageId, MessagingProvider, OutboundMessage};
use crate::error::NotifyError;
use crate::templates::{self, RenderedMessage};

pub struct NotificationDispatcher {
    registry: Arc<JobRegistry>,
    provider: Arc<dyn MessagingProvider>,
    sent: AtomicU64,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<JobRegistry>, provider: Arc<dyn MessagingProvider>) -> Self {
        Self {
            registry,
            provider,
            sent: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &Arc<dyn MessagingProvider> {
        &self.provider
    }

    /// Number of messages the provider accepted since startup.
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Send one message through the provider.
    pub async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html: &str,
    ) -> Result<MessageId, DeliveryError> {
        let message = OutboundMessage {
            to: recipient.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        };

        match self.provider.send(&message).await {
            Ok(message_id) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    provider = self.provider.name(),
                    to = %recipient,
                    message_id = %message_id,
                    "Notification dispatched"
                );
                Ok(message_id)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    to = %recipient,
                    error = %e,
                    "Notification delivery failed"
                );
                Err(e)
            }
        }
    }

    pub async fn send_signup_confirmation(&self, job_id: JobId) -> Result<MessageId, NotifyError> {
        let job = self.registry.get(job_id).await?;
        let rendered = templates::signup_confirmation(job.id, job.request_text.as_deref());
        self.send_rendered(&job.recipient, rendered).await
    }

    pub async fn send_progress_update(
        &self,
        job_id: JobId,
        stage: Stage,
        progress: u8,
        payload: Option<&serde_json::Value>,
    ) -> Result<MessageId, NotifyError> {
        let job = self.registry.get(job_id).await?;
        let rendered = templates::progress_update(job.id, stage, progress, payload);
        self.send_rendered(&job.recipient, rendered).await
    }

    pub async fn send_dashboard_ready(
        &self,
        job_id: JobId,
        result_url: &str,
        verdict: Verdict,
        report: Option<&ReportDigest>,
    ) -> Result<MessageId, NotifyError> {
        let job = self.registry.get(job_id).await?;
        let rendered = templates::dashboard_ready(job.id, result_url, verdict, report);
        self.send_rendered(&job.recipient, rendered).await
    }

    async fn send_rendered(
        &self,
        recipient: &str,
        rendered: RenderedMessage,
    ) -> Result<MessageId, NotifyError> {
        Ok(self
            .send(recipient, &rendered.subject, &rendered.html)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use signals_core::error::CoreError;

    use super::*;
    use crate::delivery::outbox::OutboxProvider;

    struct FailingProvider;

    #[async_trait]
    impl MessagingProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn send(&self, _message: &OutboundMessage) -> Result<MessageId, DeliveryError> {
            Err(DeliveryError::Provider {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    fn setup() -> (Arc<JobRegistry>, Arc<OutboxProvider>, NotificationDispatcher) {
        let registry = Arc::new(JobRegistry::new());
        let outbox = Arc::new(OutboxProvider::new());
        let dispatcher = NotificationDispatcher::new(registry.clone(), outbox.clone());
        (registry, outbox, dispatcher)
    }

    #[tokio::test]
    async fn signup_confirmation_goes_to_job_recipient() {
        let (registry, outbox, dispatcher) = setup();
        let job = registry.create("ada@example.com", None).await;

        let message_id = dispatcher.send_signup_confirmation(job.id).await.unwrap();

        assert_eq!(message_id, "outbox-1");
        assert_eq!(dispatcher.sent_count(), 1);
        let sent = outbox.last_message().unwrap();
        assert_eq!(sent.to, "ada@example.com");
        assert!(sent.html.contains(&job.id.to_string()));
    }

    #[tokio::test]
    async fn unknown_job_sends_nothing() {
        let (_registry, outbox, dispatcher) = setup();

        let result = dispatcher
            .send_progress_update(JobId::new_v4(), Stage::ParsingInput, 10, None)
            .await;

        assert_matches!(result, Err(NotifyError::Core(CoreError::UnknownJob(_))));
        assert_eq!(outbox.sent_count(), 0);
        assert_eq!(dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn each_call_sends_exactly_one_message() {
        let (registry, outbox, dispatcher) = setup();
        let job = registry.create("a@b.com", None).await;

        dispatcher
            .send_dashboard_ready(job.id, "https://x/y", Verdict::Crowded, None)
            .await
            .unwrap();
        dispatcher
            .send_dashboard_ready(job.id, "https://x/y", Verdict::Crowded, None)
            .await
            .unwrap();

        assert_eq!(outbox.sent_count(), 2);
        assert!(outbox.last_message().unwrap().html.contains("CROWDED MARKET"));
    }

    #[tokio::test]
    async fn provider_failure_is_reported_and_not_counted() {
        let registry = Arc::new(JobRegistry::new());
        let dispatcher = NotificationDispatcher::new(registry.clone(), Arc::new(FailingProvider));
        let job = registry.create("a@b.com", None).await;

        let result = dispatcher.send_signup_confirmation(job.id).await;

        assert_matches!(
            result,
            Err(NotifyError::Delivery(DeliveryError::Provider { status: 500, .. }))
        );
        assert_eq!(dispatcher.sent_count(), 0);
    }
}
