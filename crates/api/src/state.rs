use std::sync::Arc;

use signals_core::registry::JobRegistry;
use signals_events::{
    EventBus, EventHistory, MessagingProvider, NotificationDispatcher, ProgressReporter,
};
use signals_pipeline::{Collaborators, Orchestrator, PipelineConfig};
use tokio::task::JoinHandle;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// In-process job table.
    pub registry: Arc<JobRegistry>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub reporter: Arc<ProgressReporter>,
    pub orchestrator: Arc<Orchestrator>,
    /// Lifecycle event bus; the reporter publishes, the history records.
    pub event_bus: Arc<EventBus>,
    pub history: Arc<EventHistory>,
}

impl AppState {
    /// Wire the registry, dispatcher, reporter and orchestrator together.
    pub fn build(
        config: ServerConfig,
        provider: Arc<dyn MessagingProvider>,
        collaborators: Collaborators,
    ) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let event_bus = Arc::new(EventBus::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(Arc::clone(&registry), provider));
        let reporter = Arc::new(ProgressReporter::new(
            Arc::clone(&registry),
            Arc::clone(&dispatcher),
            Arc::clone(&event_bus),
        ));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&reporter),
            collaborators,
            PipelineConfig::new(config.public_base_url.clone()),
        ));

        Self {
            config: Arc::new(config),
            registry,
            dispatcher,
            reporter,
            orchestrator,
            event_bus,
            history: Arc::new(EventHistory::new()),
        }
    }

    /// Start recording bus events into the per-job history.
    pub fn spawn_history(&self) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.history).run(self.event_bus.subscribe()))
    }
}
