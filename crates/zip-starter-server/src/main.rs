use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use zip_starter_core::HttpFetcher;
use zip_starter_server::{create_router, logging, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = ServerConfig::parse();
    let state = AppState::new(Arc::new(HttpFetcher::new(config.fetch_config())));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("zip-starter server starting on {}", addr);
    axum::serve(listener, create_router(state))
        .await
        .context("server error")?;

    Ok(())
}
