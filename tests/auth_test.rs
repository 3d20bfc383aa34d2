//! Login, refresh, and route protection.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn login_issues_a_token_pair() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request_unauthenticated(
            Method::POST,
            "/auth/login",
            Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request_unauthenticated(
            Method::POST,
            "/auth/login",
            Some(json!({"email": ADMIN_EMAIL, "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_the_pair() {
    let app = TestApp::spawn().await;

    let (_, login) = app
        .request_unauthenticated(
            Method::POST,
            "/auth/login",
            Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        )
        .await;
    let refresh_token = login["refresh_token"].as_str().unwrap();

    let (status, refreshed) = app
        .request_unauthenticated(
            Method::POST,
            "/auth/refresh",
            Some(json!({"refresh_token": refresh_token})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["access_token"].as_str().is_some());
}

#[tokio::test]
async fn access_token_cannot_be_used_for_refresh() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request_unauthenticated(
            Method::POST,
            "/auth/refresh",
            Some(json!({"refresh_token": app.token.clone()})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_and_root_are_public() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request_unauthenticated(Method::GET, "/health", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
