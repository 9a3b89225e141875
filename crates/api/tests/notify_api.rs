//! Integration tests for progress and completion reporting.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, patch_json, post_json, signup};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: full progress lifecycle with mute and completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_lifecycle_respects_mute_but_always_completes() {
    let app = common::build_test_app();
    let job_id = signup(&app, "a@b.com").await;
    assert_eq!(app.sent(), 1, "signup confirmation");

    // First progress report.
    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "parsing_input", "progress": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sent"], true);
    assert_eq!(app.sent(), 2);

    let job = body_json(get(app.app(), &format!("/api/signup/{job_id}")).await).await;
    assert_eq!(job["stage"], "parsing_input");
    assert_eq!(job["progress"], 10);

    // Payload items show up in the email body.
    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({
            "jobId": job_id,
            "stage": "searching_papers",
            "progress": 30,
            "payload": { "papers": [{ "title": "X" }] },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.sent(), 3);
    let message = app.outbox.last_message().unwrap();
    assert_eq!(message.to, "a@b.com");
    assert!(message.html.contains("<li>X</li>"));

    // Unknown stage: rejected, nothing changes.
    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "invalid_stage", "progress": 50 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STAGE");
    let job = body_json(get(app.app(), &format!("/api/signup/{job_id}")).await).await;
    assert_eq!(job["stage"], "searching_papers");
    assert_eq!(job["progress"], 30);
    assert_eq!(app.sent(), 3);

    // Mute, then report: skipped without dispatch.
    let response = patch_json(
        app.app(),
        &format!("/api/signup/{job_id}/notifications"),
        json!({ "enabled": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "finding_competitors", "progress": 60 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["skipped"], true);
    assert_eq!(json["sent"], false);
    assert_eq!(app.sent(), 3);

    // Completion goes out despite the mute.
    let response = post_json(
        app.app(),
        "/api/notify/ready",
        json!({ "jobId": job_id, "resultUrl": "https://x/y", "verdict": "validated" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sent"], true);
    assert_eq!(app.sent(), 4);
    assert!(app.outbox.last_message().unwrap().html.contains("https://x/y"));

    let job = body_json(get(app.app(), &format!("/api/signup/{job_id}")).await).await;
    assert_eq!(job["stage"], "complete");
    assert_eq!(job["progress"], 100);
    assert_eq!(job["verdict"], "validated");
    assert_eq!(job["resultUrl"], "https://x/y");
    assert!(job["completedAt"].is_string());
}

// ---------------------------------------------------------------------------
// Test: re-enabling notifications restores dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unmute_restores_progress_emails() {
    let app = common::build_test_app();
    let job_id = signup(&app, "a@b.com").await;
    let uri = format!("/api/signup/{job_id}/notifications");

    patch_json(app.app(), &uri, json!({ "enabled": false })).await;
    post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "parsing_input", "progress": 20 }),
    )
    .await;
    assert_eq!(app.sent(), 1);

    let response = patch_json(app.app(), &uri, json!({ "enabled": true })).await;
    assert_eq!(body_json(response).await["notificationsEnabled"], true);

    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "searching_papers", "progress": 30 }),
    )
    .await;
    assert_eq!(body_json(response).await["sent"], true);
    assert_eq!(app.sent(), 2);
}

// ---------------------------------------------------------------------------
// Test: invalid stage wins over unknown job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_stage_is_reported_even_for_unknown_job() {
    let app = common::build_test_app();
    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({
            "jobId": "00000000-0000-0000-0000-000000000000",
            "stage": "warp_speed",
            "progress": 10,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_STAGE");
}

// ---------------------------------------------------------------------------
// Test: unknown job returns 404 for progress and ready
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_404() {
    let app = common::build_test_app();
    let missing = "7d444840-9dc0-11d1-b245-5ffdce74fad2";

    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": missing, "stage": "parsing_input", "progress": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "UNKNOWN_JOB");

    let response = post_json(
        app.app(),
        "/api/notify/ready",
        json!({ "jobId": missing, "resultUrl": "https://x/y" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.state.registry.len().await, 0);
    assert_eq!(app.sent(), 0);
}

// ---------------------------------------------------------------------------
// Test: missing fields are listed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_fields_return_400() {
    let app = common::build_test_app();

    let response = post_json(app.app(), "/api/notify/progress", json!({ "stage": "parsing_input" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_FIELDS");
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("jobId"));
    assert!(error.contains("progress"));
    assert!(!error.contains("stage"));

    let job_id = signup(&app, "a@b.com").await;
    let response = post_json(app.app(), "/api/notify/ready", json!({ "jobId": job_id })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "MISSING_FIELDS");
}

// ---------------------------------------------------------------------------
// Test: ordering and range rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stage_regression_returns_409() {
    let app = common::build_test_app();
    let job_id = signup(&app, "a@b.com").await;

    post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "finding_competitors", "progress": 50 }),
    )
    .await;

    let response = post_json(
        app.app(),
        "/api/notify/progress",
        json!({ "jobId": job_id, "stage": "parsing_input", "progress": 60 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let job = body_json(get(app.app(), &format!("/api/signup/{job_id}")).await).await;
    assert_eq!(job["stage"], "finding_competitors");
    assert_eq!(job["progress"], 50);
}

#[tokio::test]
async fn out_of_range_progress_returns_400() {
    let app = common::build_test_app();
    let job_id = signup(&app, "a@b.com").await;

    for progress in [101, -1, 1000] {
        let response = post_json(
            app.app(),
            "/api/notify/progress",
            json!({ "jobId": job_id, "stage": "parsing_input", "progress": progress }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "progress {progress}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn second_ready_returns_409() {
    let app = common::build_test_app();
    let job_id = signup(&app, "a@b.com").await;
    let body = json!({ "jobId": job_id, "resultUrl": "https://x/y" });

    let response = post_json(app.app(), "/api/notify/ready", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app.app(), "/api/notify/ready", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.sent(), 2);
}

// ---------------------------------------------------------------------------
// Test: stage catalogue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stages_are_listed_in_order() {
    let app = common::build_test_app();
    let response = get(app.app(), "/api/notify/stages").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stages = json.as_array().unwrap();
    assert_eq!(stages.len(), 7);
    assert_eq!(stages[0]["stage"], "parsing_input");
    assert_eq!(stages[0]["label"], "Understanding your idea");
    assert_eq!(stages[6]["stage"], "complete");
    assert!(stages
        .windows(2)
        .all(|w| w[0]["order"].as_u64() < w[1]["order"].as_u64()));
    assert!(stages.iter().all(|s| s["description"].is_string()));
}
