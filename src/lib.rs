//! madrasa-api: HTTP backend for a school/madrasa administrative console.
//!
//! Owns the chart of accounts and voucher bookkeeping, the academic roster
//! (years, exams, classes, students), mark entry with grade rules, computed
//! result/merit reports, and printable documents, all behind bearer-token
//! auth.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use crate::auth::AuthService;
use crate::config::AppConfig;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
}

/// All authenticated resource routes, mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .merge(handlers::ledgers::routes())
        .merge(handlers::account_categories::routes())
        .merge(handlers::contras::routes())
        .merge(handlers::journals::routes())
        .merge(handlers::payments::routes())
        .merge(handlers::academic_years::routes())
        .merge(handlers::exams::routes())
        .merge(handlers::class_configs::routes())
        .merge(handlers::students::routes())
        .merge(handlers::mark_types::routes())
        .merge(handlers::subject_mark_configs::routes())
        .merge(handlers::subject_marks::routes())
        .merge(handlers::grade_rules::routes())
        .merge(handlers::behavior_marks::routes())
        .merge(handlers::reports::routes())
}

/// Assemble the full application router: public root/health/auth routes and
/// the authenticated `/api/v1` surface.
pub fn build_app(state: AppState) -> Router {
    let protected = api_v1_routes().layer(middleware::from_fn_with_state(
        state.auth.clone(),
        auth::auth_middleware,
    ));

    Router::new()
        .route("/", get(|| async { "madrasa-api" }))
        .route("/health", get(health_check))
        .nest("/api/v1", protected)
        .with_state(state.clone())
        .nest("/auth", auth::auth_routes().with_state(state.auth))
}

async fn api_status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness probe: verifies the database connection.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match db::check_connection(state.db.as_ref()).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "healthy"}))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unhealthy", "error": e.to_string()})),
        ),
    }
}
