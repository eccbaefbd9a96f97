use std::sync::Arc;

use anyhow::Context;
use tasklist_core::{MemoryStore, TodoStore};
use tasklist_server::config::{Config, StoreConfig};
use tasklist_server::{telemetry, SqliteStore};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init().context("install tracing subscriber")?;
    let config = Config::from_env()?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    match config.store {
        StoreConfig::Memory => serve(listener, MemoryStore::new()).await,
        StoreConfig::Sqlite(url) => {
            let store = SqliteStore::connect(&url)
                .await
                .with_context(|| format!("connect to {url}"))?;
            serve(listener, store).await
        }
    }
}

async fn serve<S: TodoStore>(listener: TcpListener, store: S) -> anyhow::Result<()> {
    let store = Arc::new(store);
    tasklist_server::run(listener, store.clone(), shutdown_signal())
        .await
        .context("server shutdown")?;
    store.close().await;
    info!("store closed");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            error!(error = %err, "cannot listen for ctrl-c, running until killed");
            std::future::pending::<()>().await
        }
    }
}
