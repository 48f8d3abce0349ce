// Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Once;
use tower::ServiceExt;

use gym_tracker::api::routes::create_routes;
use gym_tracker::config::{run_migrations, AppConfig, DatabaseConfig};
use gym_tracker::db::Database;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("gym_tracker=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Router over a fresh, migrated database.
#[derive(Clone)]
pub struct TestApp {
    pub db: Database,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(DatabaseConfig::in_memory()).await
    }

    /// File database under `dir` with a multi-connection reader pool.
    pub async fn on_disk(dir: &std::path::Path) -> Self {
        let config = DatabaseConfig {
            database_url: format!("sqlite://{}", dir.join("gym_tracker.db").display()),
            max_connections: 8,
            connect_timeout: std::time::Duration::from_secs(30),
            ..DatabaseConfig::in_memory()
        };
        Self::with_config(config).await
    }

    async fn with_config(config: DatabaseConfig) -> Self {
        init_test_logging();

        let db = config.connect().await.expect("Failed to open database");
        run_migrations(db.writer())
            .await
            .expect("Failed to run migrations");

        let router = create_routes(db.clone(), &AppConfig::default());
        Self { db, router }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        };
        self.send(method, uri, body).await
    }

    /// Send a body verbatim, for requests that are not valid JSON.
    pub async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body)
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// POST that must succeed; returns the created body.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, created) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {created}");
        created
    }

    pub async fn create_user(&self, access_key: &str) -> i64 {
        let user = self
            .create("/api/users", json!({ "access_key": access_key, "nickname": "Ann" }))
            .await;
        user["id"].as_i64().unwrap()
    }

    pub async fn create_plan(&self, user_id: i64) -> i64 {
        let plan = self
            .create(
                "/api/training-plans",
                json!({
                    "user_id": user_id,
                    "name": "Spring Strength",
                    "progression_type": "linear",
                    "start_date": "2024-03-01",
                    "end_date": "2024-05-31"
                }),
            )
            .await;
        plan["id"].as_i64().unwrap()
    }

    pub async fn create_block(&self, plan_id: i64, sequence_order: i32) -> i64 {
        let block = self
            .create(
                "/api/training-blocks",
                json!({
                    "plan_id": plan_id,
                    "name": format!("Block {sequence_order}"),
                    "primary_focus": "Hypertrophy",
                    "duration_weeks": 4,
                    "sequence_order": sequence_order
                }),
            )
            .await;
        block["id"].as_i64().unwrap()
    }

    pub async fn create_exercise_type(&self, name: &str) -> i64 {
        let exercise_type = self
            .create(
                "/api/exercise-types",
                json!({ "name": name, "category": "Strength" }),
            )
            .await;
        exercise_type["id"].as_i64().unwrap()
    }

    /// User, plan and block in one go; returns the block id.
    pub async fn block_fixture(&self) -> i64 {
        let user_id = self.create_user("fixture-key").await;
        let plan_id = self.create_plan(user_id).await;
        self.create_block(plan_id, 1).await
    }
}

pub fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}
