//! Per-job event history.
//!
//! [`EventHistory`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! keeps the most recent lifecycle events of every job in memory. It runs as
//! a long-lived background task and stops when the bus sender is dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use signals_core::types::JobId;
use tokio::sync::{broadcast, RwLock};

use crate::bus::JobEvent;

/// Events kept per job; older ones are evicted first.
pub const MAX_EVENTS_PER_JOB: usize = 50;

#[derive(Default)]
pub struct EventHistory {
    events: RwLock<HashMap<JobId, VecDeque<JobEvent>>>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the recording loop until the bus closes.
    pub async fn run(self: Arc<Self>, mut receiver: broadcast::Receiver<JobEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.record(event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event history lagged, some events were not recorded");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event history shutting down");
                    break;
                }
            }
        }
    }

    pub async fn record(&self, event: JobEvent) {
        let mut events = self.events.write().await;
        let entries = events.entry(event.job_id).or_default();
        if entries.len() == MAX_EVENTS_PER_JOB {
            entries.pop_front();
        }
        entries.push_back(event);
    }

    /// Recorded events for `job_id`, oldest first. Empty when none exist.
    pub async fn for_job(&self, job_id: JobId) -> Vec<JobEvent> {
        self.events
            .read()
            .await
            .get(&job_id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}
