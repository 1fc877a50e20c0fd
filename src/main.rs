//! TaskQuest Engine - Combat and progression backend
//!
//! The Engine is the backend server that:
//! - Keeps characters, their equipment and progression
//! - Runs turn-based fights against catalog enemies
//! - Walks characters through multi-encounter dungeons
//! - Sweeps idle and finished combat sessions in the background

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskquest_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TaskQuest Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Storage: {:?}", config.storage_backend);
    tracing::info!(
        "  Session idle timeout: {}m, retention: {}m",
        config.session_idle_timeout_minutes,
        config.finished_session_retention_minutes
    );

    // Initialize application state
    let state = AppState::new(config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");

    // Session sweeper (removes idle and long-finished combat sessions)
    let sweeper = {
        let sessions = state.sessions.clone();
        let locks = state.locks.clone();
        let idle_timeout = state.config.session_idle_timeout();
        let retention = state.config.finished_session_retention();
        let interval = std::time::Duration::from_secs(state.config.session_sweep_interval_secs);
        tokio::spawn(async move {
            tracing::info!("Starting session sweeper");
            loop {
                tokio::time::sleep(interval).await;

                match sessions.purge_stale(idle_timeout, retention).await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!("Swept {} stale combat sessions", removed),
                    Err(e) => tracing::error!("Session sweep failed: {}", e),
                }

                let pruned = locks.prune().await;
                if pruned > 0 {
                    tracing::debug!("Pruned {} idle character locks", pruned);
                }
            }
        })
    };

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping sweeper...");
            sweeper.abort();
            tracing::info!("Sweeper stopped");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
