//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::domain::repository::SessionRepository;
use auth::{AccessVerifier, AuthConfig, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use notification::{NotificationService, PgNotificationRepository, notification_router};
use platform::token::TokenSecret;
use realtime::{ConnectionDirectory, RealtimeConfig, realtime_router, start_heartbeat};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "classroom_api=info,auth=info,realtime=info,notification=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let development = is_development(env::var("APP_ENV").ok().as_deref());

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    match auth_repo.delete_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    let auth_config = Arc::new(load_auth_config(development)?);
    let verifier = AccessVerifier::new(auth_repo.clone(), auth_config.clone());

    // Realtime channel and notifications share one directory
    let directory = Arc::new(ConnectionDirectory::new());
    let realtime_config = Arc::new(RealtimeConfig::default());
    let notifications = NotificationService::new(
        Arc::new(PgNotificationRepository::new(pool.clone())),
        directory.clone(),
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/auth", auth_router(auth_repo, auth_config))
        .nest(
            "/notifications",
            notification_router(notifications, verifier.clone()),
        )
        .merge(realtime_router(
            directory.clone(),
            verifier,
            realtime_config.clone(),
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let heartbeat = start_heartbeat(directory.clone(), realtime_config.heartbeat_interval);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(directory))
    .await?;

    heartbeat.abort();
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Only an explicit `APP_ENV=development` relaxes secrets and cookies;
/// unset or anything else is treated as production.
fn is_development(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|v| v.trim().eq_ignore_ascii_case("development"))
}

/// Signing secrets come from the environment unless running in
/// development, which gets random ones and insecure cookies.
fn load_auth_config(development: bool) -> anyhow::Result<AuthConfig> {
    let mut config = if development {
        tracing::warn!("Development mode: random token secrets, insecure cookies");
        AuthConfig::development()
    } else {
        AuthConfig::with_secrets(
            load_secret("ACCESS_TOKEN_SECRET")?,
            load_secret("REFRESH_TOKEN_SECRET")?,
        )
    };

    config.strict_session_check = env::var("STRICT_SESSION_CHECK").is_ok_and(|v| v == "true");
    config.password_pepper = env::var("PASSWORD_PEPPER").ok().map(String::into_bytes);

    Ok(config)
}

/// Base64-encoded secret from `var`
fn load_secret(var: &str) -> anyhow::Result<TokenSecret> {
    let encoded = env::var(var).with_context(|| format!("{var} must be set unless APP_ENV=development"))?;
    let bytes = Engine::decode(&general_purpose::STANDARD, encoded.trim())
        .with_context(|| format!("{var} must be base64"))?;
    TokenSecret::new(&bytes).with_context(|| format!("{var} is not a usable secret"))
}

/// Wait for SIGINT or SIGTERM, then close every realtime connection so
/// the server can drain.
async fn shutdown_signal(directory: Arc<ConnectionDirectory>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    directory.shutdown_all().await;
}
