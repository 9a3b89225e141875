//! Handlers for the `/signup` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use signals_core::digest::ReportDigest;
use signals_core::error::CoreError;
use signals_core::job::Job;
use signals_core::stage::Stage;
use signals_core::types::{JobId, Timestamp};
use signals_core::verdict::Verdict;
use signals_events::JobEvent;
use signals_pipeline::ResearchRequest;
use validator::Validate;

use crate::background;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, JobPath};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /signup`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub recipient: Option<String>,
    pub request_text: Option<String>,
}

/// Body of `PATCH /signup/{id}/notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationsRequest {
    pub enabled: Option<bool>,
}

/// Public view of a job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: JobId,
    pub recipient: String,
    pub request_text: Option<String>,
    pub stage: Stage,
    pub progress: u8,
    pub notifications_enabled: bool,
    pub created_at: Timestamp,
    pub last_updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub result_url: Option<String>,
    pub verdict: Option<Verdict>,
    /// Findings of the research run, once complete.
    pub report: Option<ReportDigest>,
    pub failure: Option<String>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            recipient: job.recipient,
            request_text: job.request_text,
            stage: job.stage,
            progress: job.progress,
            notifications_enabled: job.notifications_enabled,
            created_at: job.created_at,
            last_updated_at: job.last_updated_at,
            completed_at: job.completed_at,
            result_url: job.result_url,
            verdict: job.verdict,
            report: job.report,
            failure: job.failure,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEventsView {
    pub job_id: JobId,
    pub events: Vec<JobEvent>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/signup
///
/// Register a research job and send the signup confirmation. When request
/// text is supplied the research pipeline starts in the background.
pub async fn create_signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let recipient = match input.recipient.as_deref().map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => return Err(CoreError::MissingFields(vec!["recipient"]).into()),
    };
    let input = SignupRequest {
        recipient: Some(recipient.clone()),
        ..input
    };
    input.validate().map_err(|_| {
        AppError::Core(CoreError::Validation(
            "recipient must be a valid email address".into(),
        ))
    })?;

    let request_text = input
        .request_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let job = state
        .reporter
        .start_job(&recipient, request_text.clone())
        .await;

    if let Some(text) = request_text {
        background::spawn_research(&state, ResearchRequest::from_text(job.id, text));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "jobId": job.id })),
    ))
}

/// GET /api/signup/{id}
pub async fn get_signup(
    State(state): State<AppState>,
    JobPath(job_id): JobPath,
) -> AppResult<Json<JobView>> {
    let job = state.registry.get(job_id).await?;
    Ok(Json(job.into()))
}

/// PATCH /api/signup/{id}/notifications
///
/// Mute or unmute progress notifications. Completion notifications are
/// always sent.
pub async fn set_notifications(
    State(state): State<AppState>,
    JobPath(job_id): JobPath,
    ApiJson(input): ApiJson<NotificationsRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let enabled = input
        .enabled
        .ok_or(CoreError::MissingFields(vec!["enabled"]))?;

    let job = state
        .registry
        .set_notifications_enabled(job_id, enabled)
        .await?;
    tracing::info!(job_id = %job_id, enabled, "Job notifications toggled");

    Ok(Json(serde_json::json!({
        "jobId": job.id,
        "notificationsEnabled": job.notifications_enabled,
    })))
}

/// GET /api/signup/{id}/events
///
/// Recent lifecycle events of the job, oldest first.
pub async fn list_events(
    State(state): State<AppState>,
    JobPath(job_id): JobPath,
) -> AppResult<Json<JobEventsView>> {
    state.registry.get(job_id).await?;
    let events = state.history.for_job(job_id).await;
    Ok(Json(JobEventsView { job_id, events }))
}
