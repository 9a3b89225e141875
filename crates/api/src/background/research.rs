//! Background research runs.
//!
//! Handlers acknowledge their caller first and hand the pipeline to a
//! detached tokio task. Each task logs its own errors; a panic inside the
//! pipeline marks the job as failed instead of leaving it stuck.

use std::sync::Arc;

use signals_events::{MessagingProvider, ProgressReporter};
use signals_pipeline::{Orchestrator, ResearchRequest};
use tokio::task::JoinHandle;

use crate::state::AppState;

/// Run the research pipeline for an existing job in the background.
pub fn spawn_research(state: &AppState, request: ResearchRequest) -> JoinHandle<()> {
    tokio::spawn(run_research(
        Arc::clone(&state.orchestrator),
        Arc::clone(&state.reporter),
        request,
    ))
}

/// Fetch an inbound email, open a job for its sender and research it, all
/// in the background.
pub fn spawn_inbound(state: &AppState, message_id: String) -> JoinHandle<()> {
    let provider = Arc::clone(state.dispatcher.provider());
    let orchestrator = Arc::clone(&state.orchestrator);
    let reporter = Arc::clone(&state.reporter);

    tokio::spawn(async move {
        let Some((recipient, request_text)) = fetch_request(provider.as_ref(), &message_id).await
        else {
            return;
        };

        let job = reporter.start_job(&recipient, Some(request_text.clone())).await;
        tracing::info!(job_id = %job.id, message_id = %message_id, "Job opened from inbound email");

        run_research(
            orchestrator,
            reporter,
            ResearchRequest::from_text(job.id, request_text),
        )
        .await;
    })
}

async fn run_research(
    orchestrator: Arc<Orchestrator>,
    reporter: Arc<ProgressReporter>,
    request: ResearchRequest,
) {
    let job_id = request.job_id;
    let run = tokio::spawn(async move { orchestrator.run(request).await });

    match run.await {
        Ok(outcome) => {
            if outcome.delivery.is_err() {
                tracing::warn!(job_id = %job_id, "Research finished but the report was not delivered");
            }
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Research task aborted");
            if let Err(e) = reporter
                .report_failed(job_id, format!("research task aborted: {e}"))
                .await
            {
                tracing::warn!(job_id = %job_id, error = %e, "Failed to record job failure");
            }
        }
    }
}

/// Fetch the inbound message and turn it into `(recipient, request text)`.
///
/// The request text is the subject followed by the body. Returns `None`
/// (after logging) when the message cannot be fetched or has no usable
/// sender or content.
async fn fetch_request(
    provider: &dyn MessagingProvider,
    message_id: &str,
) -> Option<(String, String)> {
    let message = match provider.fetch_inbound(message_id).await {
        Ok(message) => message,
        Err(e) => {
            tracing::error!(message_id, provider = provider.name(), error = %e, "Failed to fetch inbound email");
            return None;
        }
    };

    let recipient = message.sender_address().to_string();
    if !recipient.contains('@') {
        tracing::warn!(message_id, from = %message.from, "Inbound email has no usable sender");
        return None;
    }

    let request_text = [message.subject.trim(), message.text.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if request_text.is_empty() {
        tracing::warn!(message_id, "Inbound email is empty, no job created");
        return None;
    }

    Some((recipient, request_text))
}
