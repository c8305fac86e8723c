//! Model Context Protocol endpoint configuration.

use serde::Deserialize;

/// MCP endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpConfig {
    /// Whether the MCP endpoint is exposed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// The path the MCP endpoint is mounted on.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/mcp".to_string()
}
