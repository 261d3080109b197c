//! nginx stub_status exporter.
//!
//! Polls an nginx `stub_status` endpoint on a fixed interval and re-exposes
//! its seven connection statistics on `GET /metrics` for pull-based
//! scrapers.
//!
//! # Usage
//! ```sh
//! nginx-openmetrics --service http://localhost:8080/api --port 9090
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use nginx_openmetrics::application::{Reconciler, StatusPoller};
use nginx_openmetrics::config::Config;
use nginx_openmetrics::infrastructure::nginx::NginxStatusClient;
use nginx_openmetrics::infrastructure::observability::{self, Metrics};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "nginx stub_status metrics exporter", long_about = None)]
struct Cli {
    /// The nginx stub_status endpoint, like http://localhost:8080/api
    #[arg(long, default_value = "http://localhost:8080/api")]
    service: String,

    /// Port to serve the metrics endpoint on
    #[arg(long, default_value_t = 9090)]
    port: u16,

    /// Log level (panic, fatal, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(&cli.service, cli.port, &cli.log_level)?;

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level.as_level().into()),
        )
        .with(stdout_layer)
        .init();

    info!("nginx-openmetrics {} starting...", env!("CARGO_PKG_VERSION"));
    info!("Fetching data from: {}", config.service_url);
    info!("Serving metrics at port: {}", config.port);

    let metrics = Metrics::new()?;
    let source = Arc::new(NginxStatusClient::new(config.service_url.clone()));
    let mut poller = StatusPoller::new(source, Reconciler::new(metrics.clone()));

    // Poll once before serving so the first scrape never sees an empty
    // document.
    poller.poll_once().await;
    tokio::spawn(poller.run());

    let app = observability::router(metrics);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received. Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
