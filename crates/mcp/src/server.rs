//! MCP server exposing the apartment tool registry over stdio.

use std::sync::Arc;

use aptscout_agent::{default_registry, ToolRegistry};
use aptscout_commute::CommuteClient;
use aptscout_core::AppConfig;
use aptscout_inventory::{InventoryService, ListingStore};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool as McpTool,
    },
    service::{RequestContext, RoleServer},
    ServiceExt,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AptscoutMcpServer {
    registry: Arc<ToolRegistry>,
}

impl AptscoutMcpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    /// Loads the dataset once and wires the real maps backend. A missing or
    /// unreadable dataset still yields a working server whose inventory is unavailable.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = ListingStore::load_or_empty(&config.dataset.path);
        let inventory = InventoryService::new(Arc::new(store));
        let commute = CommuteClient::from_config(&config.maps);
        Self::new(default_registry(inventory, commute))
    }

    pub fn tool_definitions(&self) -> Vec<McpTool> {
        self.registry
            .iter()
            .map(|tool| {
                let schema = match tool.input_schema() {
                    Value::Object(schema) => schema,
                    _ => Map::new(),
                };
                McpTool::new(tool.name(), tool.description(), Arc::new(schema))
            })
            .collect()
    }

    /// Run the server with stdio transport
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        use tokio::io::{stdin, stdout};

        info!(
            event_name = "mcp.server.starting",
            tools = ?self.registry.names(),
            "starting MCP server with stdio transport"
        );

        let service = self.serve((stdin(), stdout())).await?;
        let reason = service.waiting().await?;

        info!(event_name = "mcp.server.stopped", reason = ?reason, "MCP server shutdown complete");
        Ok(())
    }
}

impl std::fmt::Debug for AptscoutMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AptscoutMcpServer").field("tools", &self.registry.names()).finish()
    }
}

impl ServerHandler for AptscoutMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = "aptscout-mcp".to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            instructions: Some(
                "Aptscout apartment search. Call fetch_apartments for up to 5 listings in a \
                 city under a budget, then check_commutes once with every listing's \"lat,lng\" \
                 as origins to get travel times to a landmark."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tool_definitions()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(tool) = self.registry.get(&request.name) else {
            warn!(event_name = "mcp.tool.unknown", tool = %request.name, "unknown tool requested");
            return Err(ErrorData::invalid_params(format!("unknown tool `{}`", request.name), None));
        };

        let input = Value::Object(request.arguments.unwrap_or_default());
        let output = tool.execute(input).await.map_err(|error| {
            warn!(
                event_name = "mcp.tool.rejected",
                tool = tool.name(),
                error = %format!("{error:#}"),
                "tool input rejected"
            );
            ErrorData::invalid_params(format!("{error:#}"), None)
        })?;

        debug!(
            event_name = "mcp.tool.completed",
            tool = tool.name(),
            is_error = output.is_error,
            bytes = output.text.len(),
            "tool call completed"
        );

        let content = vec![Content::text(output.text)];
        Ok(if output.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}
