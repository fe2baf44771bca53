use std::path::PathBuf;

use filegate_core::config::{expand_path, load_config};
use filegate_core::proxy::ProxyServer;

pub async fn run(config_path: Option<PathBuf>, port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(config_path)?;

    // Apply port override if provided
    if let Some(port) = port_override {
        config.server.port = port;
    }

    if let Some(dir) = config.frontend.dist_dir.take() {
        config.frontend.dist_dir = Some(expand_path(&dir));
    }

    tracing::info!("Starting filegate...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.bind_address());
    tracing::info!("  Upstream: {}", config.upstream.target);
    tracing::info!("  Change origin: {}", config.upstream.change_origin);
    match &config.frontend.dist_dir {
        Some(dir) => tracing::info!("  Front end: {:?}", dir),
        None => tracing::info!("  Front end: disabled"),
    }

    let server = ProxyServer::new(&config)?;

    tracing::info!("Gateway starting on http://{}:{}", config.server.bind_address(), config.server.port);
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}
