//! Pocket Shop API server.
//!
//! Serves the JSON API on port 5000 by default.
//!
//! # Architecture
//!
//! - Axum web framework
//! - `PostgreSQL` via sqlx (or an in-memory store with `SHOP_STORE=memory`)
//! - HS256 bearer tokens, argon2 password hashes
//! - Sentry + tracing for errors and logs

#![cfg_attr(not(test), forbid(unsafe_code))]

use pocket_shop_api::{
    AppState, app,
    config::{ApiConfig, StoreBackend},
    db::{self, MemoryStore, Repositories},
    telemetry,
};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing(config.log_format);
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let repositories = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p pocket-shop-cli -- migrate
            Repositories::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Repositories::in_memory(&MemoryStore::new())
        }
    };

    let addr = config.socket_addr();
    let router = app(AppState::new(config, repositories));

    tracing::info!("pocket-shop-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
