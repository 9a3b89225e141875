pub mod health;
pub mod notify;
pub mod signup;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /signup                             create job (POST)
/// /signup/{id}                        job status (GET)
/// /signup/{id}/notifications          mute / unmute (PATCH)
/// /signup/{id}/events                 lifecycle event history (GET)
///
/// /notify/progress                    report stage progress (POST)
/// /notify/ready                       report completion (POST)
/// /notify/stages                      stage catalogue (GET)
///
/// /webhook/inbound                    inbound email from the provider (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/signup", signup::router())
        .nest("/notify", notify::router())
        .nest("/webhook", webhook::router())
}
