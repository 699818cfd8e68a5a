use anyhow::Context;
use tracing::{Level, info};

use resizer::config::AppConfig;
use resizer::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    let level = config.log.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        backend = ?config.storage.backend,
        upload_limit = config.upload.max_bytes,
        dedupe_inflight = config.thumbnails.dedupe_inflight,
        "Starting resizer"
    );

    let state = AppState::from_config(config)
        .await
        .context("Failed to open storage")?;
    let app = resizer::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}
