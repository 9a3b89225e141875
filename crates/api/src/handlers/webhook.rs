//! Inbound email webhook.
//!
//! The messaging provider calls this endpoint when an email arrives on the
//! inbound address. The notification only carries the message id; the full
//! message is fetched and processed in the background.

use axum::extract::State;
use axum::Json;
use signals_core::error::CoreError;

use crate::background;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Provider event type for a received email.
const EVENT_EMAIL_RECEIVED: &str = "email.received";

/// POST /api/webhook/inbound
///
/// Accepts `{type, data: {email_id}}`, `{data: {id}}` or `{emailId}`.
/// Acknowledges immediately; the fetch and the research run happen in a
/// background task whose outcome never affects this response.
pub async fn inbound_email(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(event_type) = body.get("type").and_then(|t| t.as_str()) {
        if event_type != EVENT_EMAIL_RECEIVED {
            tracing::debug!(event_type, "Ignoring non-inbound webhook event");
            return Ok(Json(serde_json::json!({ "received": true, "ignored": true })));
        }
    }

    let message_id = message_id_of(&body).ok_or(CoreError::MissingFields(vec!["email_id"]))?;
    tracing::info!(message_id = %message_id, "Inbound email notification received");

    background::spawn_inbound(&state, message_id);

    Ok(Json(serde_json::json!({ "received": true })))
}

fn message_id_of(body: &serde_json::Value) -> Option<String> {
    let data = body.get("data");
    data.and_then(|d| d.get("email_id"))
        .or_else(|| data.and_then(|d| d.get("id")))
        .or_else(|| body.get("emailId"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
