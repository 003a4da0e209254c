//! Planner Server: application entry point.

use std::time::Duration;

use anyhow::Context;
use planner_core::repository::SessionRepository;
use planner_db::DbManager;
use planner_server::{AppState, PlannerConfig, app, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    telemetry::init()?;

    let config = PlannerConfig::from_env()?;
    info!(addr = %config.server.bind_addr(), "Starting planner server");

    let db = DbManager::connect(&config.database)
        .await
        .context("connecting to SurrealDB")?;
    let state = AppState::new(db.client().clone(), config.auth.clone());

    spawn_session_sweeper(
        state.clone(),
        Duration::from_secs(config.server.session_sweep_secs),
    );

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr()))?;

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Planner server stopped");
    Ok(())
}

/// Periodically delete expired sessions. A zero interval disables the
/// sweep.
fn spawn_session_sweeper(state: AppState, every: Duration) {
    if every.is_zero() {
        return;
    }
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match state.sessions.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired sessions removed"),
                Err(e) => warn!(error = %e, "Session sweep failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
