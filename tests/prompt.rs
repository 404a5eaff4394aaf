//! Deferred Install-Prompt Tests
//!
//! The store holds at most the single most-recent deferred prompt.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn empty_slot_is_not_found() {
    let app = TestApp::new();
    let resp = app.get("/install-prompt").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "no deferred install prompt");
}

#[tokio::test]
async fn set_replaces_the_previous_prompt() {
    let app = TestApp::new();

    let resp = app
        .put_json("/install-prompt", json!({ "platforms": ["web"] }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["capturedAt"].is_string());

    app.put_json("/install-prompt", json!({ "platforms": ["android", "web"] }))
        .await;

    let resp = app.get("/install-prompt").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["platforms"], json!(["android", "web"]));
}

#[tokio::test]
async fn peek_does_not_take_the_prompt() {
    let app = TestApp::new();
    app.put_json("/install-prompt", json!({ "platforms": ["web"] }))
        .await;

    assert_eq!(app.get("/install-prompt").await.status, StatusCode::OK);
    assert_eq!(app.get("/install-prompt").await.status, StatusCode::OK);
}

#[tokio::test]
async fn consume_takes_and_clears() {
    let app = TestApp::new();
    app.put_json("/install-prompt", json!({ "platforms": ["web"] }))
        .await;

    let resp = app.post("/install-prompt/consume").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["platforms"], json!(["web"]));

    assert_eq!(
        app.post("/install-prompt/consume").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.get("/install-prompt").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_empties_the_slot() {
    let app = TestApp::new();
    app.put_json("/install-prompt", json!({ "platforms": ["web"] }))
        .await;

    let resp = app.delete("/install-prompt").await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/install-prompt").await.status, StatusCode::NOT_FOUND);
}
