//! The research job ("dashboard") record.

use chrono::Utc;
use serde::Serialize;

use crate::digest::ReportDigest;
use crate::stage::Stage;
use crate::types::{JobId, Timestamp};
use crate::verdict::Verdict;

/// Lifecycle snapshot of one research job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    /// Email address that receives notifications.
    pub recipient: String,
    /// Free-form description of what to research (idea text, company name).
    pub request_text: Option<String>,
    pub stage: Stage,
    /// Percentage in `0..=100`.
    pub progress: u8,
    pub notifications_enabled: bool,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub result_url: Option<String>,
    pub verdict: Option<Verdict>,
    /// Findings of the research run, present once complete.
    pub report: Option<ReportDigest>,
    /// Set when the job terminated early without reaching `complete`.
    pub failed_at: Option<Timestamp>,
    pub failure: Option<String>,
}

impl Job {
    /// A fresh job in the first stage with zero progress and notifications on.
    pub fn new(id: JobId, recipient: String, request_text: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            recipient,
            request_text,
            stage: Stage::first(),
            progress: 0,
            notifications_enabled: true,
            created_at: now,
            last_updated_at: now,
            completed_at: None,
            result_url: None,
            verdict: None,
            report: None,
            failed_at: None,
            failure: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Whether the job has stopped, either completed or failed.
    pub fn is_finished(&self) -> bool {
        self.is_complete() || self.failed_at.is_some()
    }
}

/// Partial update merged into a stored [`Job`].
///
/// `None` fields are left untouched. No validation happens here.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub stage: Option<Stage>,
    pub progress: Option<u8>,
    pub notifications_enabled: Option<bool>,
    pub completed_at: Option<Timestamp>,
    pub result_url: Option<String>,
    pub verdict: Option<Verdict>,
    pub report: Option<ReportDigest>,
    pub failed_at: Option<Timestamp>,
    pub failure: Option<String>,
}

impl JobPatch {
    /// Merge into `job` and bump `last_updated_at`.
    pub fn apply(self, job: &mut Job) {
        if let Some(stage) = self.stage {
            job.stage = stage;
        }
        if let Some(progress) = self.progress {
            job.progress = progress;
        }
        if let Some(enabled) = self.notifications_enabled {
            job.notifications_enabled = enabled;
        }
        if let Some(at) = self.completed_at {
            job.completed_at = Some(at);
        }
        if let Some(url) = self.result_url {
            job.result_url = Some(url);
        }
        if let Some(verdict) = self.verdict {
            job.verdict = Some(verdict);
        }
        if let Some(report) = self.report {
            job.report = Some(report);
        }
        if let Some(at) = self.failed_at {
            job.failed_at = Some(at);
        }
        if let Some(reason) = self.failure {
            job.failure = Some(reason);
        }
        job.last_updated_at = Utc::now();
    }
}
