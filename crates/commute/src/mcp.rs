//! Real commute backend: one short-lived MCP session with the maps server per request.

use std::borrow::Cow;
use std::time::Duration;

use aptscout_core::config::MapsConfig;
use aptscout_core::CommuteRequest;
use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, Content, RawContent};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use rmcp::ServiceExt;
use secrecy::{ExposeSecret, SecretString};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::backend::CommuteBackend;
use crate::CommuteError;

type MapsSession = RunningService<RoleClient, ()>;

/// Launch parameters for the maps MCP server.
#[derive(Clone, Debug)]
pub struct MapsServerSettings {
    pub command: String,
    pub args: Vec<String>,
    pub api_key: Option<SecretString>,
    pub api_key_env: String,
    pub tool_name: String,
    pub timeout: Duration,
}

impl From<&MapsConfig> for MapsServerSettings {
    fn from(config: &MapsConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            tool_name: config.tool_name.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Spawns the maps server for every request. Nothing is pooled or reused across calls.
#[derive(Clone, Debug)]
pub struct McpDistanceMatrix {
    settings: MapsServerSettings,
}

impl McpDistanceMatrix {
    pub fn new(settings: MapsServerSettings) -> Self {
        Self { settings }
    }

    fn api_key(&self) -> Result<&SecretString, CommuteError> {
        self.settings
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(CommuteError::MissingCredential)
    }

    async fn connect(&self, api_key: &SecretString) -> Result<MapsSession, CommuteError> {
        let mut command = Command::new(&self.settings.command);
        command.args(&self.settings.args).env(&self.settings.api_key_env, api_key.expose_secret());

        let transport = TokioChildProcess::new(command).map_err(|error| CommuteError::Spawn {
            command: self.settings.command.clone(),
            reason: error.to_string(),
        })?;

        // `()` is a client handler that ignores server-initiated requests.
        ().serve(transport).await.map_err(|error| CommuteError::Handshake(error.to_string()))
    }

    async fn exchange(
        &self,
        api_key: &SecretString,
        request: &CommuteRequest,
    ) -> Result<String, CommuteError> {
        let session = self.connect(api_key).await?;
        info!(
            event_name = "commute.session.started",
            command = %self.settings.command,
            origins = request.origins().len(),
            mode = %request.mode(),
            "maps server session established"
        );

        let result = self.call_distance_matrix(&session, request).await;

        if let Err(error) = session.cancel().await {
            warn!(
                event_name = "commute.session.teardown_failed",
                %error,
                "maps session teardown failed"
            );
        }

        result
    }

    async fn call_distance_matrix(
        &self,
        session: &MapsSession,
        request: &CommuteRequest,
    ) -> Result<String, CommuteError> {
        let tools = session
            .list_all_tools()
            .await
            .map_err(|error| CommuteError::ListTools(error.to_string()))?;
        debug!(
            tools = ?tools.iter().map(|tool| &*tool.name).collect::<Vec<&str>>(),
            "maps server tools"
        );

        let tool_name = self.settings.tool_name.as_str();
        if !tools.iter().any(|tool| &*tool.name == tool_name) {
            return Err(CommuteError::ToolUnavailable(tool_name.to_string()));
        }

        let result = session
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(tool_name.to_string()),
                arguments: Some(request.arguments()),
            })
            .await
            .map_err(|error| CommuteError::Call(error.to_string()))?;

        if result.is_error.unwrap_or(false) {
            debug!("maps server flagged the distance matrix result as an error");
        }

        first_text(&result.content).ok_or(CommuteError::EmptyResponse)
    }
}

#[async_trait]
impl CommuteBackend for McpDistanceMatrix {
    fn name(&self) -> &'static str {
        "mcp"
    }

    async fn distance_matrix(&self, request: &CommuteRequest) -> Result<String, CommuteError> {
        let api_key = self.api_key()?;
        let timeout = self.settings.timeout;

        match tokio::time::timeout(timeout, self.exchange(api_key, request)).await {
            Ok(result) => result,
            // dropping the session future kills the child
            Err(_) => Err(CommuteError::Timeout(timeout.as_secs())),
        }
    }
}

fn first_text(content: &[Content]) -> Option<String> {
    content.iter().find_map(|item| match &item.raw {
        RawContent::Text(text) => Some(text.text.clone()),
        _ => None,
    })
}
