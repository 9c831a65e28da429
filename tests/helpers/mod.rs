//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ledgerdesk_api::{AppState, build_app};
use ledgerdesk_core::config::AppConfig;

pub const OWNER: &str = "chef@firma.de";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired services, for seeding and inspection
    pub state: AppState,
    /// Temporary data directory, removed on drop
    pub data_dir: TempDir,
}

/// Test response wrapper
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body as JSON
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application over an empty data directory
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.store.data_dir = data_dir.path().to_string_lossy().into_owned();

        let state = AppState::new(config).await.expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            data_dir,
        }
    }

    /// Create a test application with a registered owner
    pub async fn with_owner() -> Self {
        let app = Self::new().await;
        app.state
            .user_service
            .bootstrap_owner(OWNER, "Chefin")
            .await
            .expect("Failed to register owner");
        app
    }

    /// Make an HTTP request to the test app, acting as `actor`
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(email) = actor {
            builder = builder.header("x-user-email", email);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create an entity as the owner
    pub async fn create_entity(&self, id: &str, managers: &[&str]) -> TestResponse {
        self.request(
            "POST",
            "/api/entities",
            Some(serde_json::json!({
                "id": id,
                "name": format!("{id} GmbH"),
                "managers": managers,
            })),
            Some(OWNER),
        )
        .await
    }

    /// Invite a user as `actor`
    pub async fn invite(
        &self,
        actor: &str,
        email: &str,
        role: &str,
        accessible: &[&str],
        managed: &[&str],
        modules: Value,
    ) -> TestResponse {
        self.request(
            "POST",
            "/api/users/invite",
            Some(serde_json::json!({
                "email": email,
                "name": email,
                "role": role,
                "accessibleEntityIds": accessible,
                "managedEntityIds": managed,
                "modulePermissions": modules,
            })),
            Some(actor),
        )
        .await
    }

    /// Read a data file as JSON
    pub fn read_data_file(&self, name: &str) -> Value {
        let raw = std::fs::read_to_string(self.data_dir.path().join(name)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}
