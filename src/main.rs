// src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use status_notifier::{
    config,
    health::Poller,
    monitor::Monitor,
    notifier::{Notifier, SlackSink},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("status_notifier=debug".parse()?)
                .add_directive("reqwest=info".parse()?),
        )
        .init();

    // Optional config file; the environment always overrides it
    let config_path = std::env::args().nth(1);
    match &config_path {
        Some(path) => info!("Loading configuration from: {}", path),
        None => info!("Loading configuration from environment"),
    }
    let config = config::load_config(config_path.as_deref())?;

    let poller = Poller::new(config.status_check_endpoint.clone())?;
    let notifier = Notifier::new(config.throttle());
    let sink = Arc::new(SlackSink::new(config.slack())?);

    let monitor = Monitor::new(poller, notifier, sink, config.ping_interval());
    let handle = monitor.handle();
    let task = tokio::spawn(monitor.run());

    shutdown_signal().await;
    handle.shutdown();
    task.await?;

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
