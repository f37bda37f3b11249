//! Common test utilities for Vinolab server integration tests
//!
//! Every test gets its own in-memory SQLite store with migrations applied,
//! wrapped in the full application router.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestApp;
//!
//! #[tokio::test]
//! async fn test_health() {
//!     let app = TestApp::new().await;
//!     let (status, body) = app.get("/health").await;
//!     assert_eq!(status, StatusCode::OK);
//! }
//! ```

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use vinolab_server::{
    api::{self, AppState},
    config::Config,
    db,
};

/// Application router backed by a private in-memory store
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = db::create_memory_pool()
            .await
            .expect("Failed to create in-memory store");
        let router = api::create_router(AppState { db: pool.clone() }, &Config::default());
        Self { router, pool }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, value)
    }

    /// Import `rows` under `source` through the API and return the batch id
    pub async fn import(&self, source: &str, rows: Vec<Value>) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/samples/import",
                json!({ "source": source, "rows": rows }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "import failed: {}", body);
        body["data"]["batch_id"].as_i64().unwrap()
    }
}

/// JSON row for a sample
pub fn sample_row(alcohol: f64, malic_acid: f64, color_intensity: f64, target: i64) -> Value {
    json!({
        "alcohol": alcohol,
        "malic_acid": malic_acid,
        "color_intensity": color_intensity,
        "target": target,
    })
}

/// Three well-separated clusters of `per_class` samples each
pub fn clustered_rows(per_class: usize) -> Vec<Value> {
    let mut rows = Vec::new();
    for target in 0..3_i64 {
        let base = target as f64;
        for i in 0..per_class {
            let jitter = i as f64 * 0.01;
            rows.push(sample_row(
                11.0 + base + jitter,
                2.0 - jitter,
                3.0 + 2.0 * base + jitter,
                target,
            ));
        }
    }
    rows
}
