//! Aptscout MCP server binary.
//!
//! ```bash
//! # dataset at the default path, maps key from the environment
//! GOOGLE_MAPS_API_KEY=... aptscout-mcp
//!
//! # explicit dataset and maps server
//! APTSCOUT_DATASET_PATH=data/apartments_cleaned.csv \
//! APTSCOUT_MAPS_COMMAND=npx \
//! APTSCOUT_MAPS_ARGS="-y @modelcontextprotocol/server-google-maps" \
//!   aptscout-mcp
//! ```

use anyhow::Result;
use aptscout_core::{AppConfig, LoadOptions};
use aptscout_mcp::{init_logging, AptscoutMcpServer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config.logging)?;

    info!(
        event_name = "mcp.config.loaded",
        dataset = %config.dataset.path.display(),
        maps_command = %config.maps.command,
        timeout_secs = config.maps.timeout_secs,
        "aptscout MCP server configured"
    );
    if config.maps_credential_missing() {
        warn!(
            event_name = "mcp.config.maps_credential_missing",
            env = %config.maps.api_key_env,
            "no maps API key configured; check_commutes will report a connection error"
        );
    }

    AptscoutMcpServer::from_config(&config).run_stdio().await
}
