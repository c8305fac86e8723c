//! Test harness for the Greenhouse MCP server.
//!
//! Spawns the real server on an ephemeral port, connects to it with the rmcp
//! streamable HTTP client, and points the Harvest client at a local mock of
//! the Harvest API.

pub mod mock;

use std::net::SocketAddr;

use config::Config;
use rmcp::{
    model::CallToolRequestParam,
    service::{RunningService, ServiceExt},
    transport::StreamableHttpClientTransport,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// MCP client for driving the server under test.
pub struct McpTestClient {
    service: RunningService<rmcp::RoleClient, ()>,
}

impl McpTestClient {
    /// Connect to the given MCP endpoint URL.
    pub async fn new(mcp_url: String) -> Self {
        let transport = StreamableHttpClientTransport::from_uri(mcp_url);
        let service = ().serve(transport).await.unwrap();

        Self { service }
    }

    /// Get server information.
    pub fn get_server_info(&self) -> &rmcp::model::InitializeResult {
        self.service.peer_info().unwrap()
    }

    /// List available tools.
    pub async fn list_tools(&self) -> rmcp::model::ListToolsResult {
        self.service.list_tools(Default::default()).await.unwrap()
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> rmcp::model::CallToolResult {
        let arguments = arguments.as_object().cloned();

        self.service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments,
            })
            .await
            .unwrap()
    }

    /// Call a tool and expect it to fail.
    pub async fn call_tool_expect_error(&self, name: &str, arguments: Value) -> rmcp::ServiceError {
        let arguments = arguments.as_object().cloned();

        self.service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments,
            })
            .await
            .unwrap_err()
    }

    /// Disconnect the client.
    pub async fn disconnect(self) {
        self.service.cancel().await.unwrap();
    }
}

/// Parse the JSON document from a successful tool result.
pub fn json_content(result: &rmcp::model::CallToolResult) -> Value {
    let text = result.content[0].raw.as_text().expect("tool returned non-text content");

    serde_json::from_str(&text.text).expect("tool returned invalid JSON")
}

/// Test server that manages the lifecycle of a server instance.
pub struct TestServer {
    /// The address the server listens on.
    pub address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the given TOML configuration.
    pub async fn start(config_toml: &str) -> Self {
        let config: Config = toml::from_str(config_toml).unwrap();

        // Binding before the spawn means clients can connect right away.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            if let Err(e) = server::serve_with_listener(listener, config).await {
                eprintln!("Server failed: {e}");
            }
        });

        Self { address, _handle: handle }
    }

    /// Connect an MCP client to this server's MCP endpoint.
    pub async fn mcp_client(&self) -> McpTestClient {
        McpTestClient::new(format!("http://{}/mcp", self.address)).await
    }
}
