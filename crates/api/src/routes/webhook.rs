use axum::routing::post;
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Routes mounted at `/webhook`.
///
/// ```text
/// POST   /inbound                   -> inbound_email
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/inbound", post(webhook::inbound_email))
}
