//! REST API test harness.
//!
//! Every test gets its own in-memory SQLite backend and a temporary image
//! directory, wrapped in an axum-test [`TestServer`].

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use petitio_persistence::backends::sqlite::SqliteBackend;
use petitio_rest::{AppState, ServerConfig, create_app_with_state};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const X_AUTHORIZATION: HeaderName = HeaderName::from_static("x-authorization");

pub const PASSWORD: &str = "password123";

/// A running test application.
pub struct TestApp {
    pub server: TestServer,
    pub backend: Arc<SqliteBackend>,
    pub config: ServerConfig,
    images: TempDir,
}

/// A logged-in test user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

impl Session {
    pub fn header(&self) -> HeaderValue {
        HeaderValue::from_str(&self.token).expect("token is a valid header value")
    }
}

impl TestApp {
    pub fn new() -> Self {
        let images = tempfile::tempdir().expect("Failed to create image directory");
        let config = ServerConfig {
            image_dir: images.path().to_path_buf(),
            ..ServerConfig::for_testing()
        };

        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        let backend = Arc::new(backend);

        let state = AppState::new(Arc::clone(&backend), config.clone());
        let server = TestServer::new(create_app_with_state(state))
            .expect("Failed to create test server");

        Self {
            server,
            backend,
            config,
            images,
        }
    }

    /// Prefixes a route with the API base path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_path, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(&self.url(path)).await
    }

    pub async fn get_as(&self, session: &Session, path: &str) -> TestResponse {
        self.server
            .get(&self.url(path))
            .add_header(X_AUTHORIZATION, session.header())
            .await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.server.post(&self.url(path)).json(&body).await
    }

    pub async fn post_as(&self, session: &Session, path: &str, body: Value) -> TestResponse {
        self.server
            .post(&self.url(path))
            .add_header(X_AUTHORIZATION, session.header())
            .json(&body)
            .await
    }

    pub async fn put_as(&self, session: &Session, path: &str, body: Value) -> TestResponse {
        self.server
            .put(&self.url(path))
            .add_header(X_AUTHORIZATION, session.header())
            .json(&body)
            .await
    }

    pub async fn patch_as(&self, session: &Session, path: &str, body: Value) -> TestResponse {
        self.server
            .patch(&self.url(path))
            .add_header(X_AUTHORIZATION, session.header())
            .json(&body)
            .await
    }

    pub async fn delete_as(&self, session: &Session, path: &str) -> TestResponse {
        self.server
            .delete(&self.url(path))
            .add_header(X_AUTHORIZATION, session.header())
            .await
    }

    /// Registers a user and returns the new id.
    pub async fn register(&self, first_name: &str, email: &str) -> i64 {
        let response = self
            .post_json(
                "/users/register",
                json!({
                    "firstName": first_name,
                    "lastName": "Tester",
                    "email": email,
                    "password": PASSWORD
                }),
            )
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["userId"]
            .as_i64()
            .expect("userId in register response")
    }

    pub async fn login(&self, email: &str) -> Session {
        let response = self
            .post_json("/users/login", json!({ "email": email, "password": PASSWORD }))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        Session {
            user_id: body["userId"].as_i64().expect("userId in login response"),
            token: body["token"]
                .as_str()
                .expect("token in login response")
                .to_string(),
        }
    }

    /// Registers and logs in a user.
    pub async fn user(&self, first_name: &str, email: &str) -> Session {
        self.register(first_name, email).await;
        self.login(email).await
    }

    /// Creates a petition with one tier per cost and returns its id.
    pub async fn petition(
        &self,
        owner: &Session,
        title: &str,
        category_id: i64,
        costs: &[i64],
    ) -> i64 {
        let response = self
            .post_as(owner, "/petitions", petition_body(title, category_id, costs))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["petitionId"]
            .as_i64()
            .expect("petitionId in create response")
    }

    /// The ids of a petition's tiers, in creation order.
    pub async fn tier_ids(&self, petition_id: i64) -> Vec<i64> {
        let detail = self.get(&format!("/petitions/{}", petition_id)).await;
        detail.assert_status_ok();
        detail.json::<Value>()["supportTiers"]
            .as_array()
            .expect("supportTiers array")
            .iter()
            .map(|t| t["supportTierId"].as_i64().expect("supportTierId"))
            .collect()
    }

    pub async fn support(&self, supporter: &Session, petition_id: i64, tier_id: i64) {
        self.post_as(
            supporter,
            &format!("/petitions/{}/supporters", petition_id),
            json!({ "supportTierId": tier_id, "message": "Good luck" }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    pub fn image_dir(&self) -> &std::path::Path {
        self.images.path()
    }
}

/// A create-petition body with tiers titled `Tier 1`, `Tier 2`, ...
pub fn petition_body(title: &str, category_id: i64, costs: &[i64]) -> Value {
    let tiers: Vec<Value> = costs
        .iter()
        .enumerate()
        .map(|(i, cost)| {
            json!({
                "title": format!("Tier {}", i + 1),
                "description": format!("Support at level {}", i + 1),
                "cost": cost
            })
        })
        .collect();

    json!({
        "title": title,
        "description": format!("About {}", title),
        "categoryId": category_id,
        "supportTiers": tiers
    })
}

/// Asserts the standard error envelope.
pub fn assert_error(response: &TestResponse, status: StatusCode) {
    response.assert_status(status);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["status"], status.as_u16());
    assert!(body["error"]["message"].is_string());
}
