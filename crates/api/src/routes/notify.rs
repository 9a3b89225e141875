//! Route definitions for progress and completion reporting.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notify;
use crate::state::AppState;

/// Routes mounted at `/notify`.
///
/// ```text
/// POST   /progress                  -> report_progress
/// POST   /ready                     -> report_ready
/// GET    /stages                    -> list_stages
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/progress", post(notify::report_progress))
        .route("/ready", post(notify::report_ready))
        .route("/stages", get(notify::list_stages))
}
