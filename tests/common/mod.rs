//! Integration test harness: an in-memory SQLite database, migrated schema,
//! a seeded admin account, and the full application router driven through
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use madrasa_api::auth::{seed_admin, AuthConfig, AuthService};
use madrasa_api::config::AppConfig;
use madrasa_api::db::{establish_connection_with_config, run_migrations, DbConfig};
use madrasa_api::{build_app, AppState};

const TEST_JWT_SECRET: &str =
    "integration_test_secret_key_that_is_long_enough_for_the_validator";
pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "test-password-123";

pub struct TestApp {
    pub app: Router,
    pub token: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // A single pooled connection keeps every query on the same
        // in-memory database.
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = establish_connection_with_config(&db_config)
            .await
            .expect("connect to in-memory sqlite");
        run_migrations(&pool).await.expect("run migrations");
        let db = Arc::new(pool);

        let auth = Arc::new(AuthService::new(
            AuthConfig::new(
                TEST_JWT_SECRET.to_string(),
                Duration::from_secs(3600),
                Duration::from_secs(86_400),
            ),
            db.clone(),
        ));

        seed_admin(db.as_ref(), ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("seed admin");

        let config = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            3600,
            86_400,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );

        let state = AppState {
            db,
            config,
            auth: auth.clone(),
        };
        let app = build_app(state);

        let (status, body) = request_raw(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(serde_json::json!({
                "email": ADMIN_EMAIL,
                "password": ADMIN_PASSWORD,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let token = body["access_token"]
            .as_str()
            .expect("access token in login response")
            .to_string();

        Self { app, token }
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

    /// Authenticated JSON request.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        request_raw(&self.app, method, uri, Some(&self.token), body).await
    }

    /// Request without an Authorization header.
    pub async fn request_unauthenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        request_raw(&self.app, method, uri, None, body).await
    }

    /// GET returning the raw response body, for text/html endpoints.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::empty())
            .expect("build request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

async fn request_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
