//! chat-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay and REST endpoints.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use chat_relay::app_state::AppState;
use chat_relay::build_app;
use chat_relay::config::{LogFormat, RelayConfig};
use chat_relay::persistence::PostgresPersistence;
use chat_relay::persistence::postgres::retention_cutoff;
use chat_relay::service::RelayService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting chat-relay");

    // Optional transcript store
    let store = if config.persistence_enabled {
        let store = PostgresPersistence::connect(&config)
            .await
            .context("connecting to transcript database")?;
        tracing::info!("transcript persistence enabled");
        Some(store)
    } else {
        tracing::info!("transcript persistence disabled");
        None
    };

    // Build service layer and application state
    let relay_service = RelayService::new(store);
    let app_state = AppState::new(relay_service, config.max_message_bytes);

    if app_state.relay_service.persistence_enabled() && config.cleanup_after_days > 0 {
        retention_cutoff(chrono::Utc::now(), config.cleanup_after_days)
            .context("PERSISTENCE_CLEANUP_AFTER_DAYS")?;
        spawn_cleanup(&app_state, &config);
    }

    let app = build_app(app_state, config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Periodically deletes transcript rows past the retention window.
fn spawn_cleanup(state: &AppState, config: &RelayConfig) {
    let service = std::sync::Arc::clone(&state.relay_service);
    let days = config.cleanup_after_days;
    let period = Duration::from_secs(config.cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match service.purge_older_than(days).await {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, days, "purged old transcript rows"),
                Err(err) => tracing::warn!(error = %err, "transcript cleanup failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
