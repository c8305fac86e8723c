//! MCP endpoint exposing the Greenhouse Harvest API as a set of tools.

#![deny(missing_docs)]

mod server;
mod tool;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, routing};
use config::Config;
use rmcp::transport::{
    StreamableHttpServerConfig, StreamableHttpService, streamable_http_server::session::never::NeverSessionManager,
};

/// Creates an axum router serving the MCP endpoint.
pub fn router(config: &Config) -> anyhow::Result<Router> {
    log::info!("Creating MCP router for path: {}", config.mcp.path);

    let mcp_server = server::McpServer::new(config)?;

    let service = StreamableHttpService::new(
        move || Ok(mcp_server.clone()),
        Arc::new(NeverSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: Some(Duration::from_secs(5)),
            stateful_mode: false,
        },
    );

    // Some MCP clients probe with OPTIONS before connecting.
    async fn handle_options() -> StatusCode {
        StatusCode::OK
    }

    Ok(Router::new().route(
        &config.mcp.path,
        routing::get_service(service.clone())
            .post_service(service.clone())
            .delete_service(service)
            .options(handle_options),
    ))
}
