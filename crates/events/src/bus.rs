//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`JobEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signals_core::stage::Stage;
use signals_core::types::JobId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// JobEvent
// ---------------------------------------------------------------------------

/// A lifecycle event for a single research job.
///
/// Constructed via [`JobEvent::new`] and enriched with
/// [`at_stage`](JobEvent::at_stage) and [`with_payload`](JobEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEvent {
    /// Dot-separated event name, e.g. `"job.progress"`. See
    /// [`signals_core::job_events`].
    pub event_type: String,

    pub job_id: JobId,

    /// Stage the job was in when the event occurred, if relevant.
    pub stage: Option<Stage>,

    /// Progress percentage at the time of the event, if relevant.
    pub progress: Option<u8>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl JobEvent {
    pub fn new(event_type: impl Into<String>, job_id: JobId) -> Self {
        Self {
            event_type: event_type.into(),
            job_id,
            stage: None,
            progress: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn at_stage(mut self, stage: Stage, progress: u8) -> Self {
        self.stage = Some(stage);
        self.progress = Some(progress);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`JobEvent`].
pub struct EventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: JobEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use signals_core::job_events::{EVENT_JOB_CREATED, EVENT_JOB_PROGRESS};

    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let job_id = JobId::new_v4();

        bus.publish(
            JobEvent::new(EVENT_JOB_PROGRESS, job_id)
                .at_stage(Stage::AnalyzingMarket, 70)
                .with_payload(serde_json::json!({"key": "value"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_JOB_PROGRESS);
        assert_eq!(received.job_id, job_id);
        assert_eq!(received.stage, Some(Stage::AnalyzingMarket));
        assert_eq!(received.progress, Some(70));
        assert_eq!(received.payload["key"], "value");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(JobEvent::new(EVENT_JOB_CREATED, JobId::new_v4()));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, EVENT_JOB_CREATED);
        assert_eq!(e2.job_id, e1.job_id);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(JobEvent::new(EVENT_JOB_CREATED, JobId::new_v4()));
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = JobEvent::new("bare.event", JobId::new_v4());
        assert!(event.stage.is_none());
        assert!(event.progress.is_none());
        assert!(event.payload.is_object());
    }
}
