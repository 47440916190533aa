use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use todo_core::MongoStore;
use todo_server::{telemetry, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    telemetry::init_tracing(config.debug)?;
    config.validate().context("invalid configuration")?;

    let store = MongoStore::connect(config.mongo_config())
        .await
        .context("failed to connect to MongoDB")?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "listening");

    todo_server::run(listener, Arc::new(store))
        .await
        .context("server error")?;
    Ok(())
}
