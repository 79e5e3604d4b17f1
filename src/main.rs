mod config;
mod git;
mod github;
mod http;
mod logger;
mod notify;
mod pipeline;
mod publish;
mod report;
mod runner;
mod webhook;
mod workspace;

use anyhow::{Context, Result};
use config::Config;
use pipeline::Pipeline;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use webhook::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().await.context("Cannot load config")?;
    logger::init(&config.log_level)?;

    log::info!("Starting");
    log::debug!("{:?}", config);

    let addr = config.server.socket_addr();
    let state = AppState {
        pipeline: Arc::new(Pipeline::new(Arc::new(config))),
    };

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {}", addr))?;
    log::info!("Listening on {}", addr);

    axum::serve(listener, webhook::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = wait_for_signal().await {
        log::error!("Cannot listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}

async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => result,
            _ = sigterm.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c().await
    }
}
