// src/main.rs
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tracing::info;

use compat_health::config;
use compat_health::health::{HealthService, NoopChecker};
use compat_health::server::HealthServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compat_health=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;
    let addr = config.listen_addr()?;

    let service = Arc::new(HealthService::new(
        config.identity(),
        config.compatible_with.clone(),
        Arc::new(NoopChecker),
    ));

    let handle = HealthServer::new(addr, service).start().await?;
    info!("Serving health endpoint for '{}' on {}", config.name, handle.local_addr());

    shutdown_signal().await;
    handle.shutdown().await;

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
