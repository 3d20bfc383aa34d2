use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use madrasa_api::auth::{self, AuthConfig, AuthService};
use madrasa_api::config::{init_tracing, load_config, AppConfig};
use madrasa_api::{build_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(config.log_level(), config.log_json);
    info!(environment = %config.environment, "starting madrasa-api");

    let pool = db::establish_connection_from_app_config(&config).await?;
    if config.auto_migrate {
        info!("running database migrations");
        db::run_migrations(&pool).await?;
    }
    let db = Arc::new(pool);

    let auth_service = Arc::new(AuthService::new(
        AuthConfig::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.jwt_expiration as u64),
            Duration::from_secs(config.refresh_token_expiration as u64),
        ),
        db.clone(),
    ));

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        if let Err(e) = auth::seed_admin(db.as_ref(), email, password).await {
            warn!(error = %e, "failed to seed admin account");
        }
    }

    let cors = build_cors(&config)?;

    let state = AppState {
        db,
        config: config.clone(),
        auth: auth_service.clone(),
    };

    let app = build_app(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}

fn build_cors(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    if let Some(origins) = config
        .cors_allowed_origins
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        let parsed: Result<Vec<HeaderValue>, _> = origins
            .split(',')
            .map(|o| o.trim().parse::<HeaderValue>())
            .collect();
        let parsed = parsed.map_err(|e| anyhow::anyhow!("invalid CORS origin: {e}"))?;
        return Ok(CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(methods)
            .allow_headers(headers));
    }

    if config.should_allow_permissive_cors() {
        warn!("CORS: allowing any origin");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers));
    }

    error!("no CORS origins configured outside development");
    anyhow::bail!("cors_allowed_origins must be set in this environment")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C"),
        _ = terminate => info!("received SIGTERM"),
    }
}
