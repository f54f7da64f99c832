use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use roombook_server::config::init_logging;
use roombook_server::{AppState, MemoryStore, ServerConfig, app};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const HIDE_TIMESTAMP_ENV: &str = "ROOMBOOK_HIDE_TIMESTAMP";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging(env::var_os(HIDE_TIMESTAMP_ENV).is_some());

    let config_path = ServerConfig::default_path();
    debug!(path = %config_path.display(), "config path");
    let config = ServerConfig::load(&config_path)?;
    debug!(?config, "config");

    if config.database_url.is_some() {
        warn!("DATABASE_URL is set, but this build serves from the in-memory store");
    }

    let addr = SocketAddr::new(config.address, config.port);
    let state = AppState::new(Arc::new(MemoryStore::new()), config);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
