//! Window Registry & Bridge Lifecycle Tests
//!
//! Covers registration by the application shell, focus handling, and
//! generation install/activate handover.

mod common;

use axum::http::StatusCode;
use common::{TestApp, APP_ORIGIN};
use serde_json::json;

// ===========================================================================
// Registration
// ===========================================================================

#[tokio::test]
async fn windows_are_listed_in_registration_order() {
    let app = TestApp::new();

    let a = app
        .register_window(&format!("{}/a", APP_ORIGIN), false)
        .await;
    let b = app
        .register_window(&format!("{}/b", APP_ORIGIN), false)
        .await;

    let resp = app.get("/windows").await;
    assert_eq!(resp.status, StatusCode::OK);

    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], a["id"]);
    assert_eq!(items[1]["id"], b["id"]);
    assert!(items[0]["registeredAt"].is_string());
}

#[tokio::test]
async fn registering_a_focused_window_unfocuses_the_rest() {
    let app = TestApp::new();

    let a = app
        .register_window(&format!("{}/a", APP_ORIGIN), true)
        .await;
    assert_eq!(a["focused"], json!(true));

    let b = app
        .register_window(&format!("{}/b", APP_ORIGIN), true)
        .await;
    assert_eq!(b["focused"], json!(true));

    let items = app.get("/windows").await.json()["items"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(items[0]["focused"], json!(false));
    assert_eq!(items[1]["focused"], json!(true));
}

#[tokio::test]
async fn invalid_window_url_is_rejected() {
    let app = TestApp::new();
    let resp = app
        .post_json("/windows", json!({ "url": "not a url" }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "invalid window url");
}

#[tokio::test]
async fn unregister_removes_the_window() {
    let app = TestApp::new();
    let window = app
        .register_window(&format!("{}/a", APP_ORIGIN), false)
        .await;
    let id = window["id"].as_str().unwrap().to_string();

    let resp = app.delete(&format!("/windows/{}", id)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.delete(&format!("/windows/{}", id)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let items = app.get("/windows").await.json()["items"]
        .as_array()
        .unwrap()
        .clone();
    assert!(items.is_empty());
}

#[tokio::test]
async fn focus_is_exclusive_across_windows() {
    let app = TestApp::new();
    let a = app
        .register_window(&format!("{}/a", APP_ORIGIN), true)
        .await;
    let b = app
        .register_window(&format!("{}/b", APP_ORIGIN), false)
        .await;

    let resp = app
        .post(&format!("/windows/{}/focus", b["id"].as_str().unwrap()))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["focused"], json!(true));

    let items = app.get("/windows").await.json()["items"]
        .as_array()
        .unwrap()
        .clone();
    let a_entry = items.iter().find(|w| w["id"] == a["id"]).unwrap();
    assert_eq!(a_entry["focused"], json!(false));
}

// ===========================================================================
// Lifecycle
// ===========================================================================

#[tokio::test]
async fn activate_before_install_is_a_conflict() {
    let app = TestApp::new();
    let resp = app.post("/lifecycle/activate").await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.error_message(), "no bridge generation installed");
}

#[tokio::test]
async fn activation_claims_registered_and_future_windows() {
    let app = TestApp::new();
    app.register_window(&format!("{}/a", APP_ORIGIN), false)
        .await;
    app.register_window(&format!("{}/b", APP_ORIGIN), false)
        .await;

    let installed = app.post("/lifecycle/install").await;
    assert_eq!(installed.status, StatusCode::OK);
    let installed = installed.json();
    assert_eq!(installed["phase"], json!("installed"));
    let generation = installed["generation"].clone();

    let activated = app.post("/lifecycle/activate").await;
    assert_eq!(activated.status, StatusCode::OK);
    let activated = activated.json();
    assert_eq!(activated["phase"], json!("activated"));
    assert_eq!(activated["generation"], generation);
    assert_eq!(activated["claimedWindows"], json!(2));

    for window in app.get("/windows").await.json()["items"].as_array().unwrap() {
        assert_eq!(window["controlledBy"], generation);
    }

    // windows opened after activation are claimed on registration
    let late = app
        .register_window(&format!("{}/c", APP_ORIGIN), false)
        .await;
    assert_eq!(late["controlledBy"], generation);
}

#[tokio::test]
async fn reinstalling_promotes_the_new_generation() {
    let app = TestApp::new();
    app.register_window(&format!("{}/a", APP_ORIGIN), false)
        .await;

    app.post("/lifecycle/install").await;
    app.post("/lifecycle/activate").await;

    let second = app.post("/lifecycle/install").await.json()["generation"].clone();
    let activated = app.post("/lifecycle/activate").await.json();
    assert_eq!(activated["generation"], second);

    for window in app.get("/windows").await.json()["items"].as_array().unwrap() {
        assert_eq!(window["controlledBy"], second);
    }
}
