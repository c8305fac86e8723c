//! Greenhouse MCP configuration structures to map the greenhouse-mcp.toml configuration.

#![deny(missing_docs)]

mod harvest;
mod health;
mod loader;
mod mcp;

use std::{net::SocketAddr, path::Path};

pub use harvest::{HarvestConfig, RateWindowConfig, default_base_url};
pub use health::HealthConfig;
pub use mcp::McpConfig;
use serde::Deserialize;

/// Main configuration structure for the greenhouse-mcp application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model Context Protocol configuration settings.
    #[serde(default)]
    pub mcp: McpConfig,
    /// Greenhouse Harvest API configuration settings.
    #[serde(default)]
    pub harvest: HarvestConfig,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Resolves the Harvest credential from the file or from the
    /// `GREENHOUSE_API_KEY` environment variable, and fails when neither
    /// is present.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Build a configuration without a file, from defaults and the environment.
    pub fn from_env() -> anyhow::Result<Config> {
        loader::finalize(Config::default())
    }
}

/// HTTP server configuration settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The socket address the server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// Health endpoint configuration.
    #[serde(default)]
    pub health: HealthConfig,
}
