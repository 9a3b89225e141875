//! Handlers for progress and completion reporting.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use signals_core::digest::ReportDigest;
use signals_core::error::CoreError;
use signals_core::stage::Stage;
use signals_events::ProgressOutcome;

use super::parse_job_id;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /notify/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub job_id: Option<String>,
    pub stage: Option<String>,
    pub progress: Option<i64>,
    /// Optional preview of items found in this stage.
    pub payload: Option<serde_json::Value>,
}

/// Body of `POST /notify/ready`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyRequest {
    pub job_id: Option<String>,
    pub result_url: Option<String>,
    pub verdict: Option<String>,
    /// Findings to include in the completion email and store on the job.
    pub report: Option<ReportDigest>,
}

#[derive(Debug, Serialize)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: &'static str,
    pub description: &'static str,
    pub order: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/notify/progress
///
/// Returns `{sent: true, messageId}` or, for a muted job, `{skipped: true}`.
pub async fn report_progress(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProgressRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let (Some(job_id), Some(stage), Some(progress)) = (&input.job_id, &input.stage, input.progress)
    else {
        let mut missing = Vec::new();
        if input.job_id.is_none() {
            missing.push("jobId");
        }
        if input.stage.is_none() {
            missing.push("stage");
        }
        if input.progress.is_none() {
            missing.push("progress");
        }
        return Err(CoreError::MissingFields(missing).into());
    };

    // Unknown stage names are rejected before anything else is looked at.
    Stage::parse(stage)?;
    let job_id = parse_job_id(job_id)?;
    let progress = u8::try_from(progress)
        .map_err(|_| CoreError::Validation(format!("progress must be 0-100, got {progress}")))?;

    let outcome = state
        .reporter
        .report_progress(job_id, stage, progress, input.payload)
        .await?;

    let body = match outcome {
        ProgressOutcome::Sent(message_id) => {
            serde_json::json!({ "sent": true, "messageId": message_id })
        }
        ProgressOutcome::Skipped => serde_json::json!({ "sent": false, "skipped": true }),
    };
    Ok(Json(body))
}

/// POST /api/notify/ready
///
/// Marks the job complete and sends the completion email, even when the job
/// is muted.
pub async fn report_ready(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ReadyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let job_id = input
        .job_id
        .as_deref()
        .ok_or(CoreError::MissingFields(vec!["jobId"]))?;
    let job_id = parse_job_id(job_id)?;

    let message_id = state
        .reporter
        .report_ready(
            job_id,
            input.result_url.as_deref(),
            input.verdict.as_deref(),
            input.report,
        )
        .await?;

    Ok(Json(serde_json::json!({ "sent": true, "messageId": message_id })))
}

/// GET /api/notify/stages
pub async fn list_stages() -> Json<Vec<StageInfo>> {
    Json(
        Stage::ALL
            .into_iter()
            .map(|stage| StageInfo {
                stage,
                label: stage.label(),
                description: stage.description(),
                order: stage.position(),
            })
            .collect(),
    )
}
