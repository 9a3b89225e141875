//! In-memory outbox provider.
//!
//! Used when no real messaging provider is configured (local development)
//! and by tests. Every message is logged and kept in memory; inbound
//! messages can be seeded with [`OutboxProvider::add_inbound`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{DeliveryError, InboundMessage, MessageId, MessagingProvider, OutboundMessage};

#[derive(Default)]
pub struct OutboxProvider {
    sent: Mutex<Vec<(MessageId, OutboundMessage)>>,
    inbound: Mutex<HashMap<String, InboundMessage>>,
}

impl OutboxProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every message sent so far, oldest first.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn sent_count(&self) -> usize {
        lock(&self.sent).len()
    }

    pub fn last_message(&self) -> Option<OutboundMessage> {
        lock(&self.sent).last().map(|(_, m)| m.clone())
    }

    /// Make an inbound message available to [`MessagingProvider::fetch_inbound`].
    pub fn add_inbound(&self, message: InboundMessage) {
        lock(&self.inbound).insert(message.id.clone(), message);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A poisoned outbox only means a panicking test thread; the data is
    // still usable.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl MessagingProvider for OutboxProvider {
    fn name(&self) -> &'static str {
        "outbox"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<MessageId, DeliveryError> {
        let mut sent = lock(&self.sent);
        let message_id = format!("outbox-{}", sent.len() + 1);
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            message_id = %message_id,
            "Notification recorded in outbox"
        );
        sent.push((message_id.clone(), message.clone()));
        Ok(message_id)
    }

    async fn fetch_inbound(&self, message_id: &str) -> Result<InboundMessage, DeliveryError> {
        lock(&self.inbound)
            .get(message_id)
            .cloned()
            .ok_or_else(|| DeliveryError::Provider {
                status: 404,
                body: format!("inbound message {message_id} not found"),
            })
    }
}
