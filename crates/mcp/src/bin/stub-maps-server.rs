//! Stand-in for the Google Maps MCP server, used by integration tests and local runs
//! without a maps key. Answers `maps_distance_matrix` with a deterministic matrix.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::{RequestContext, RoleServer},
    ServiceExt,
};
use serde_json::{json, Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResponseMode {
    /// Pretty-printed JSON matrix, one row per origin.
    Json,
    /// A plain sentence that is not JSON.
    Text,
    /// A result with no content at all.
    Empty,
}

#[derive(Clone, Debug, Parser)]
#[command(name = "stub-maps-server")]
struct StubArgs {
    #[arg(long, value_enum, default_value_t = ResponseMode::Json)]
    mode: ResponseMode,
    /// Sleep before answering each call.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Environment variable that must hold a non-empty key.
    #[arg(long, default_value = "GOOGLE_MAPS_API_KEY")]
    key_env: String,
    #[arg(long, default_value = "maps_distance_matrix")]
    tool_name: String,
}

#[derive(Clone, Debug)]
struct StubMapsServer {
    args: StubArgs,
}

impl StubMapsServer {
    fn tool(&self) -> Tool {
        let schema = match json!({
            "type": "object",
            "properties": {
                "origins": { "type": "array", "items": { "type": "string" } },
                "destinations": { "type": "array", "items": { "type": "string" } },
                "mode": { "type": "string" }
            },
            "required": ["origins", "destinations"]
        }) {
            Value::Object(schema) => schema,
            _ => Map::new(),
        };
        Tool::new(
            self.args.tool_name.clone(),
            "Calculate travel distance and time for multiple origins and destinations",
            Arc::new(schema),
        )
    }

    fn has_key(&self) -> bool {
        std::env::var(&self.args.key_env).is_ok_and(|key| !key.trim().is_empty())
    }
}

fn string_list(arguments: &Map<String, Value>, field: &str) -> Vec<String> {
    arguments
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn matrix(origins: &[String], destinations: &[String], mode: &str) -> Value {
    let results: Vec<Value> = (0..origins.len())
        .map(|row| {
            let elements: Vec<Value> = (0..destinations.len())
                .map(|column| {
                    let meters = 5_000 + 1_500 * row as u64 + 700 * column as u64;
                    let seconds = meters / 10;
                    let distance = format!("{:.1} km", meters as f64 / 1000.0);
                    let duration = format!("{} mins", seconds.div_ceil(60));
                    json!({
                        "status": "OK",
                        "distance": { "text": distance, "value": meters },
                        "duration": { "text": duration, "value": seconds }
                    })
                })
                .collect();
            json!({ "elements": elements })
        })
        .collect();

    json!({
        "origin_addresses": origins,
        "destination_addresses": destinations,
        "mode": mode,
        "results": results
    })
}

impl ServerHandler for StubMapsServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = "stub-maps-server".to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            instructions: None,
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(vec![self.tool()]))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if request.name != self.args.tool_name.as_str() {
            return Err(ErrorData::invalid_params(format!("unknown tool `{}`", request.name), None));
        }
        if !self.has_key() {
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "{} environment variable is not set",
                self.args.key_env
            ))]));
        }
        if self.args.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.args.delay_ms)).await;
        }

        let arguments = request.arguments.unwrap_or_default();
        let origins = string_list(&arguments, "origins");
        let destinations = string_list(&arguments, "destinations");
        let mode = arguments.get("mode").and_then(Value::as_str).unwrap_or("driving");

        match self.args.mode {
            ResponseMode::Json => {
                let body = serde_json::to_string_pretty(&matrix(&origins, &destinations, mode))
                    .map_err(|error| ErrorData::internal_error(error.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(body)]))
            }
            ResponseMode::Text => Ok(CallToolResult::success(vec![Content::text(format!(
                "Distance matrix unavailable for {} origin(s): REQUEST_DENIED",
                origins.len()
            ))])),
            ResponseMode::Empty => Ok(CallToolResult::success(Vec::new())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = StubArgs::parse();
    aptscout_core::init_logging(&aptscout_core::AppConfig::default().logging)?;
    tracing::info!(mode = ?args.mode, tool = %args.tool_name, "stub maps server starting");

    let service = StubMapsServer { args }.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
    service.waiting().await?;
    Ok(())
}
