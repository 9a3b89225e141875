//! Route definitions for the `/signup` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::signup;
use crate::state::AppState;

/// Routes mounted at `/signup`.
///
/// ```text
/// POST   /                          -> create_signup
/// GET    /{id}                      -> get_signup
/// PATCH  /{id}/notifications        -> set_notifications
/// GET    /{id}/events               -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(signup::create_signup))
        .route("/{id}", get(signup::get_signup))
        .route("/{id}/notifications", patch(signup::set_notifications))
        .route("/{id}/events", get(signup::list_events))
}
