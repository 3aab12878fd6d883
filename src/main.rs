use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use rollcall::modules::sessions::service::purge_expired_sessions;
use rollcall::router::init_router;
use rollcall::state::{AppState, init_app_state};
use rollcall_config::ServerConfig;
use rollcall_observability::{init_metrics, init_tracing, metrics_app, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await?;

    spawn_session_purger(state.clone());

    if let Some(handle) = init_metrics() {
        let metrics_address = server_config.metrics_bind_address();
        let listener = tokio::net::TcpListener::bind(&metrics_address)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {metrics_address}"))?;
        tracing::info!(address = %metrics_address, "Metrics available at /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(address = %address, "Server running");
    tracing::info!("Scalar UI available at http://{address}/scalar");

    let app = init_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

/// Periodically deletes expired sessions and idle rate limiter buckets.
fn spawn_session_purger(state: AppState) {
    let period = Duration::from_secs(state.session_config.purge_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = purge_expired_sessions(&state.store).await {
                tracing::error!(error = %e, "Failed to purge expired sessions");
            }
            state.rate_limiters.retain_recent();
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}
