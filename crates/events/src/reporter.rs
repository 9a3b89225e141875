//! Progress reporter.
//!
//! The single entry point for moving a job through its lifecycle. Each
//! operation validates the requested transition, applies it to the
//! [`JobRegistry`] in one critical section, publishes a [`JobEvent`] and
//! triggers the matching notification.
//!
//! Progress notifications respect the job's mute flag. Signup confirmations
//! and completion notifications are always sent.

use std::sync::Arc;

use chrono::Utc;
use signals_core::digest::ReportDigest;
use signals_core::error::CoreError;
use signals_core::job::{Job, JobPatch};
use signals_core::job_events::{
    EVENT_JOB_CREATED, EVENT_JOB_FAILED, EVENT_JOB_PROGRESS, EVENT_JOB_READY,
    EVENT_NOTIFICATION_FAILED, EVENT_NOTIFICATION_SENT, EVENT_NOTIFICATION_SKIPPED,
};
use signals_core::registry::JobRegistry;
use signals_core::stage::Stage;
use signals_core::types::JobId;
use signals_core::verdict::Verdict;

use crate::bus::{EventBus, JobEvent};
use crate::delivery::MessageId;
use crate::dispatcher::NotificationDispatcher;
use crate::error::NotifyError;

/// Result of a successful [`ProgressReporter::report_progress`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// The progress notification was handed to the messaging provider.
    Sent(MessageId),
    /// The job is muted; state was updated but nothing was sent.
    Skipped,
}

pub struct ProgressReporter {
    registry: Arc<JobRegistry>,
    dispatcher: Arc<NotificationDispatcher>,
    bus: Arc<EventBus>,
}

impl ProgressReporter {
    pub fn new(
        registry: Arc<JobRegistry>,
        dispatcher: Arc<NotificationDispatcher>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            bus,
        }
    }

    /// Register a new job and send its signup confirmation.
    ///
    /// A failed confirmation is logged and recorded as an event; the job is
    /// still returned.
    pub async fn start_job(&self, recipient: &str, request_text: Option<String>) -> Job {
        let job = self.registry.create(recipient, request_text).await;
        tracing::info!(job_id = %job.id, recipient = %job.recipient, "Research job created");
        self.bus.publish(
            JobEvent::new(EVENT_JOB_CREATED, job.id)
                .at_stage(job.stage, job.progress)
                .with_payload(serde_json::json!({ "recipient": job.recipient })),
        );

        let result = self.dispatcher.send_signup_confirmation(job.id).await;
        if let Err(e) = &result {
            tracing::warn!(job_id = %job.id, error = %e, "Failed to send signup confirmation");
        }
        self.record_delivery(job.id, "signup_confirmation", &result);
        job
    }

    /// Advance a job to `stage` at `progress` percent.
    ///
    /// Errors, in check order:
    /// - [`CoreError::InvalidStage`] when `stage` is not a known stage name;
    /// - [`CoreError::Validation`] when `progress > 100` or `stage` is
    ///   `complete` (completion goes through [`report_ready`](Self::report_ready));
    /// - [`CoreError::UnknownJob`];
    /// - [`CoreError::Conflict`] when the job already finished, the stage
    ///   moves backwards, or progress decreases within the same stage.
    ///
    /// Rejected calls leave the job untouched. A delivery failure is
    /// returned after the state change has been applied.
    pub async fn report_progress(
        &self,
        job_id: JobId,
        stage: &str,
        progress: u8,
        payload: Option<serde_json::Value>,
    ) -> Result<ProgressOutcome, NotifyError> {
        let stage = Stage::parse(stage)?;
        if stage.is_terminal() {
            return Err(CoreError::Validation(
                "the complete stage is reported through the ready notification".into(),
            )
            .into());
        }
        if progress > 100 {
            return Err(
                CoreError::Validation(format!("progress must be 0-100, got {progress}")).into(),
            );
        }

        let job = self
            .registry
            .update_with(job_id, |job| {
                check_transition(job, stage, progress)?;
                Ok(JobPatch {
                    stage: Some(stage),
                    progress: Some(progress),
                    ..Default::default()
                })
            })
            .await?;

        tracing::info!(job_id = %job_id, stage = %stage, progress, "Job progress updated");
        let mut event = JobEvent::new(EVENT_JOB_PROGRESS, job_id).at_stage(stage, progress);
        if let Some(payload) = &payload {
            event = event.with_payload(payload.clone());
        }
        self.bus.publish(event);

        if !job.notifications_enabled {
            tracing::debug!(job_id = %job_id, stage = %stage, "Notifications muted, skipping progress email");
            self.bus.publish(
                JobEvent::new(EVENT_NOTIFICATION_SKIPPED, job_id)
                    .at_stage(stage, progress)
                    .with_payload(serde_json::json!({ "kind": "progress" })),
            );
            return Ok(ProgressOutcome::Skipped);
        }

        let result = self
            .dispatcher
            .send_progress_update(job_id, stage, progress, payload.as_ref())
            .await;
        self.record_delivery(job_id, "progress", &result);
        result.map(ProgressOutcome::Sent)
    }

    /// Mark a job complete and send the completion notification.
    ///
    /// `result_url` is required. `verdict` is interpreted leniently and
    /// defaults to `needs_research`. A `report` is stored on the job and
    /// rendered into the email. The notification ignores the mute flag.
    /// A job completes at most once; a second call, or a call on a failed
    /// job, is a [`CoreError::Conflict`].
    pub async fn report_ready(
        &self,
        job_id: JobId,
        result_url: Option<&str>,
        verdict: Option<&str>,
        report: Option<ReportDigest>,
    ) -> Result<MessageId, NotifyError> {
        self.registry.get(job_id).await?;
        let result_url = result_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(CoreError::MissingFields(vec!["resultUrl"]))?
            .to_string();
        let verdict = verdict.map(Verdict::from_lenient).unwrap_or_default();

        let job = self
            .registry
            .update_with(job_id, |job| {
                if job.is_finished() {
                    return Err(CoreError::Conflict(format!("job {} already finished", job.id)));
                }
                Ok(JobPatch {
                    stage: Some(Stage::Complete),
                    progress: Some(100),
                    completed_at: Some(Utc::now()),
                    result_url: Some(result_url.clone()),
                    verdict: Some(verdict),
                    report: report.clone(),
                    ..Default::default()
                })
            })
            .await?;

        tracing::info!(job_id = %job_id, verdict = %verdict, "Job complete");
        self.bus.publish(
            JobEvent::new(EVENT_JOB_READY, job_id)
                .at_stage(job.stage, job.progress)
                .with_payload(serde_json::json!({
                    "resultUrl": result_url,
                    "verdict": verdict,
                })),
        );

        let result = self
            .dispatcher
            .send_dashboard_ready(job_id, &result_url, verdict, job.report.as_ref())
            .await;
        self.record_delivery(job_id, "dashboard_ready", &result);
        result
    }

    /// Record that a job stopped early. No notification is sent.
    pub async fn report_failed(
        &self,
        job_id: JobId,
        reason: impl Into<String>,
    ) -> Result<Job, NotifyError> {
        let reason = reason.into();
        let job = self
            .registry
            .update_with(job_id, |job| {
                if job.is_finished() {
                    return Err(CoreError::Conflict(format!("job {} already finished", job.id)));
                }
                Ok(JobPatch {
                    failed_at: Some(Utc::now()),
                    failure: Some(reason.clone()),
                    ..Default::default()
                })
            })
            .await?;

        tracing::warn!(job_id = %job_id, reason = %reason, "Job failed");
        self.bus.publish(
            JobEvent::new(EVENT_JOB_FAILED, job_id)
                .at_stage(job.stage, job.progress)
                .with_payload(serde_json::json!({ "reason": reason })),
        );
        Ok(job)
    }

    fn record_delivery(
        &self,
        job_id: JobId,
        kind: &str,
        result: &Result<MessageId, NotifyError>,
    ) {
        let event = match result {
            Ok(message_id) => JobEvent::new(EVENT_NOTIFICATION_SENT, job_id)
                .with_payload(serde_json::json!({ "kind": kind, "messageId": message_id })),
            Err(e) => JobEvent::new(EVENT_NOTIFICATION_FAILED, job_id)
                .with_payload(serde_json::json!({ "kind": kind, "error": e.to_string() })),
        };
        self.bus.publish(event);
    }
}

fn check_transition(job: &Job, stage: Stage, progress: u8) -> Result<(), CoreError> {
    if job.is_finished() {
        return Err(CoreError::Conflict(format!("job {} already finished", job.id)));
    }
    if stage < job.stage {
        return Err(CoreError::Conflict(format!(
            "stage cannot move back from {} to {stage}",
            job.stage
        )));
    }
    if stage == job.stage && progress < job.progress {
        return Err(CoreError::Conflict(format!(
            "progress cannot decrease from {} to {progress} within {stage}",
            job.progress
        )));
    }
    Ok(())
}
