use std::{ops::Deref, sync::Arc};

use config::Config;
use harvest::HarvestClient;
use indoc::indoc;
use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorCode, ErrorData, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};

use crate::tool::{self, RmcpTool};

const INSTRUCTIONS: &str = indoc! {r#"
    This server exposes the Greenhouse Harvest recruiting API. Jobs, candidates,
    applications and pipeline stages can be listed and fetched; candidates can be
    created, updated and annotated; applications can be advanced through their
    hiring pipeline or rejected.

    Stage moves need stage IDs: call list_job_stages for the relevant job first.
    All requests share one rate window towards Greenhouse, so large listings may
    take a while to page through.
"#};

#[derive(Clone)]
pub(crate) struct McpServer(Arc<McpServerInner>);

pub(crate) struct McpServerInner {
    info: ServerInfo,
    tools: Vec<Box<dyn RmcpTool>>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").finish_non_exhaustive()
    }
}

impl Deref for McpServer {
    type Target = McpServerInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl McpServer {
    pub(crate) fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Arc::new(HarvestClient::new(&config.harvest)?);

        let inner = McpServerInner {
            info: ServerInfo {
                capabilities: ServerCapabilities::builder().enable_tools().build(),
                server_info: Implementation {
                    name: "Greenhouse Harvest".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    ..Implementation::default()
                },
                instructions: Some(INSTRUCTIONS.to_string()),
                ..ServerInfo::default()
            },
            tools: tool::all(client),
        };

        Ok(Self(Arc::new(inner)))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        self.info.clone()
    }

    async fn list_tools(
        &self,
        _: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools.iter().map(|tool| tool.to_tool()).collect(),
        })
    }

    async fn call_tool(
        &self,
        CallToolRequestParam { name, arguments }: CallToolRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if let Some(tool) = self.tools.iter().find(|tool| tool.name() == name) {
            return tool.call(arguments).await;
        }

        Err(ErrorData::new(
            ErrorCode::INVALID_PARAMS,
            format!("Unknown tool '{name}'"),
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.harvest.api_key = Some("test-key".into());
        config
    }

    #[test]
    fn all_seventeen_tools_are_exposed() {
        let server = McpServer::new(&test_config()).unwrap();
        let names: Vec<_> = server.tools.iter().map(|tool| tool.name()).collect();

        insta::assert_debug_snapshot!(names, @r#"
        [
            "list_jobs",
            "get_job",
            "list_candidates",
            "get_candidate",
            "create_candidate",
            "update_candidate",
            "add_note_to_candidate",
            "list_applications",
            "get_application",
            "advance_application",
            "reject_application",
            "add_note_to_application",
            "list_job_stages",
            "get_job_stage",
            "list_departments",
            "list_offices",
            "list_users",
        ]
        "#);
    }

    #[test]
    fn missing_credential_fails_construction() {
        let error = McpServer::new(&Config::default()).unwrap_err();
        assert!(error.to_string().contains("API key"));
    }

    #[test]
    fn tool_schemas_have_typed_parameters() {
        let server = McpServer::new(&test_config()).unwrap();

        let advance = server
            .tools
            .iter()
            .find(|tool| tool.name() == "advance_application")
            .unwrap()
            .to_tool();

        let schema = serde_json::to_value(advance.input_schema.as_ref()).unwrap();
        let required = schema["required"].as_array().unwrap();

        assert!(required.iter().any(|v| v == "application_id"));
        assert!(required.iter().any(|v| v == "from_stage_id"));
        assert!(!required.iter().any(|v| v == "to_stage_id"));
    }
}
