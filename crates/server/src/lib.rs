//! Greenhouse MCP server library.
//!
//! Provides a reusable serve function used by both the binary and the
//! integration tests.

#![deny(missing_docs)]

mod health;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{Router, routing::get};
use config::Config;
use tokio::net::TcpListener;

/// Configuration for serving the Greenhouse MCP endpoint.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to.
    pub listen_address: SocketAddr,
    /// The deserialized TOML configuration.
    pub config: Config,
}

/// Starts and runs the server with the provided configuration.
pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    serve_with_listener(listener, config).await
}

/// Serves on an already-bound listener.
///
/// The integration tests bind an ephemeral port themselves and hand the
/// listener over, so they know the address before the server runs.
pub async fn serve_with_listener(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    let listen_address = listener.local_addr()?;
    let mut app = Router::new();
    let mut mcp_exposed = false;

    if config.mcp.enabled {
        app = app.merge(mcp::router(&config)?);
        mcp_exposed = true;
    }

    if config.server.health.enabled {
        app = app.route(&config.server.health.path, get(health::health));
        log::info!(
            "Health endpoint available at: http://{listen_address}{}",
            config.server.health.path
        );
    }

    if mcp_exposed {
        log::info!("MCP endpoint available at: http://{listen_address}{}", config.mcp.path);
    } else {
        log::warn!("MCP endpoint disabled in the configuration; only the health endpoint is served");
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    Ok(())
}
