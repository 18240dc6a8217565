//! Common test utilities for API testing with mocks.
//!
//! Builds an in-process router around a fresh engine with a
//! [`MockAnnouncer`] injected, so requests run without binding a port.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nextqueue_core::{
    testing::MockAnnouncer, Announcer, Config, EngineConfig, QueueEngine, SharedQueueEngine,
};
use nextqueue_server::api::{create_router, WsBroadcaster};
use nextqueue_server::state::AppState;

/// Test fixture wrapping the API router.
pub struct TestFixture {
    pub router: Router,
    /// Direct handle on the engine behind the router
    pub engine: SharedQueueEngine,
    /// Records every announcement
    pub announcer: Arc<MockAnnouncer>,
    pub ws_broadcaster: WsBroadcaster,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with an empty engine.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Fixture whose engine is seeded from the given engine config.
    pub fn with_engine_config(engine: EngineConfig) -> Self {
        Self::with_config(Config {
            engine,
            ..Default::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        let engine = SharedQueueEngine::new(QueueEngine::with_config(&config.engine));
        let announcer = Arc::new(MockAnnouncer::new());
        let ws_broadcaster = WsBroadcaster::new(64);

        let state = Arc::new(AppState::new(
            config,
            engine.clone(),
            Arc::clone(&announcer) as Arc<dyn Announcer>,
            ws_broadcaster.clone(),
        ));

        Self {
            router: create_router(state),
            engine,
            announcer,
            ws_broadcaster,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// POST without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request with optional JSON body.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).to_string()))
        };

        TestResponse { status, body }
    }

    /// Wait until the announcer has recorded `count` announcements.
    pub async fn wait_for_announcements(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let texts = self.announcer.texts();
            if texts.len() >= count {
                return texts;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.announcer.texts()
    }

    // ------------------------------------------------------------------
    // Shortcuts
    // ------------------------------------------------------------------

    /// Create a stage and return its JSON.
    pub async fn add_stage(&self, name: &str) -> Value {
        let response = self
            .post("/api/v1/stages", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    /// Issue a ticket and return its JSON.
    pub async fn issue_ticket(&self, is_priority: bool) -> Value {
        let response = self
            .post(
                "/api/v1/tickets",
                serde_json::json!({ "is_priority": is_priority }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull a string field out of a JSON value.
pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field {} in {}", key, value))
}
