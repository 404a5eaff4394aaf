#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use url::Url;

use taleem_bridge::infra::store::LayoutStore;
use taleem_bridge::{http, AppState};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const APP_ORIGIN: &str = "https://taleemhub.example";
pub const BRIDGE_TOKEN: &str = "test-bridge-token-12345";

// ---------------------------------------------------------------------------
// TestApp — fresh per test, backed by the in-memory layout store
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn with_bridge_token() -> Self {
        Self::build(Some(BRIDGE_TOKEN))
    }

    fn build(bridge_token: Option<&str>) -> Self {
        let state = AppState::new(
            LayoutStore::memory(),
            Url::parse(APP_ORIGIN).expect("test origin must parse"),
            Duration::from_secs(5),
            bridge_token.map(str::to_string),
        );
        let router = http::router(state.clone());
        TestApp { router, state }
    }

    // ------------------------------------------------------------------
    // Low-level request helper
    // ------------------------------------------------------------------
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        for &(key, value) in headers {
            builder = builder.header(key, value);
        }

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        self.send(request).await
    }

    /// Push ingest takes an arbitrary byte body, not JSON.
    pub async fn push_raw(&self, body: &[u8], headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/push")
            .header("host", "localhost");
        for &(key, value) in headers {
            builder = builder.header(key, value);
        }
        let request = builder.body(Body::from(body.to_vec())).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    // ------------------------------------------------------------------
    // Convenience HTTP helpers
    // ------------------------------------------------------------------
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Method::POST, path, None, &[]).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None, &[]).await
    }

    // Identity-scoped variants: the fronting application layer forwards
    // the authenticated identity in these headers.
    pub async fn get_as(&self, path: &str, user_id: &str, role: &str) -> TestResponse {
        self.request(
            Method::GET,
            path,
            None,
            &[("x-user-id", user_id), ("x-user-role", role)],
        )
        .await
    }

    pub async fn post_json_as(
        &self,
        path: &str,
        body: Value,
        user_id: &str,
        role: &str,
    ) -> TestResponse {
        self.request(
            Method::POST,
            path,
            Some(body),
            &[("x-user-id", user_id), ("x-user-role", role)],
        )
        .await
    }

    pub async fn post_as(&self, path: &str, user_id: &str, role: &str) -> TestResponse {
        self.request(
            Method::POST,
            path,
            None,
            &[("x-user-id", user_id), ("x-user-role", role)],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------
    pub async fn register_window(&self, url: &str, focused: bool) -> Value {
        let resp = self
            .post_json(
                "/windows",
                serde_json::json!({ "url": url, "focused": focused }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "window registration failed");
        resp.json()
    }

    pub async fn push_notification(&self, body: &[u8]) -> Value {
        let resp = self.push_raw(body, &[]).await;
        assert_eq!(resp.status, StatusCode::OK, "push ingest failed");
        resp.json()
    }
}

pub fn widget_ids(layout: &Value) -> Vec<String> {
    layout["widgets"]
        .as_array()
        .expect("layout must carry a widgets array")
        .iter()
        .map(|widget| widget["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn widget_orders(layout: &Value) -> Vec<u64> {
    layout["widgets"]
        .as_array()
        .expect("layout must carry a widgets array")
        .iter()
        .map(|widget| widget["order"].as_u64().unwrap())
        .collect()
}
