//! Integration tests for the inbound email webhook.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, wait_until};
use serde_json::json;
use signals_core::stage::Stage;
use signals_events::InboundMessage;

#[tokio::test]
async fn missing_message_id_returns_400() {
    let app = common::build_test_app();
    let response = post_json(
        app.app(),
        "/api/webhook/inbound",
        json!({ "type": "email.received", "data": {} }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "MISSING_FIELDS");
}

#[tokio::test]
async fn other_event_types_are_ignored() {
    let app = common::build_test_app();
    let response = post_json(
        app.app(),
        "/api/webhook/inbound",
        json!({ "type": "email.delivered", "data": { "email_id": "em_1" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);
    assert_eq!(json["ignored"], true);
}

// ---------------------------------------------------------------------------
// Test: an inbound email opens a job and runs research to completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inbound_email_starts_research_for_sender() {
    let app = common::build_test_app();
    app.outbox.add_inbound(InboundMessage {
        id: "em_42".into(),
        from: "Ada Lovelace <ada@example.com>".into(),
        subject: "Idea: meal kits for dogs".into(),
        text: "Fresh, vet-approved meals delivered weekly.".into(),
    });

    let response = post_json(
        app.app(),
        "/api/webhook/inbound",
        json!({ "type": "email.received", "data": { "email_id": "em_42" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);

    // Confirmation, four progress updates and the completion email.
    wait_until(|| app.outbox.sent_count() >= 6).await;

    let jobs = app.state.registry.list().await;
    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.recipient, "ada@example.com");
    assert_eq!(job.stage, Stage::Complete);
    assert_eq!(
        job.request_text.as_deref(),
        Some("Idea: meal kits for dogs\n\nFresh, vet-approved meals delivered weekly.")
    );
    assert!(app
        .outbox
        .messages()
        .iter()
        .all(|m| m.to == "ada@example.com"));
}

// ---------------------------------------------------------------------------
// Test: a fetch failure is acknowledged and creates nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_message_is_acknowledged_without_a_job() {
    let app = common::build_test_app();
    let response = post_json(app.app(), "/api/webhook/inbound", json!({ "emailId": "em_missing" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["received"], true);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(app.state.registry.is_empty().await);
    assert_eq!(app.sent(), 0);
}
