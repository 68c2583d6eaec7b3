mod config;
mod error;
mod redirect;
mod server;

use config::ProxyConfig;
use server::{router, AppState};

/// CORS relay and redirect resolver for the atlas map viewer
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ProxyConfig::from_env()?;
    let state = AppState::new(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    log::info!("atlasmap-proxy listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("atlasmap-proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
    }
}
