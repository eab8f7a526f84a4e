//! Commute matrix client.
//!
//! Asks an external maps server, spoken to over MCP on a child process's
//! stdio, for travel distance and duration from a batch of origins to one
//! destination.
//!
//! - `CommuteBackend`: the seam between request handling and transport
//! - `McpDistanceMatrix`: spawns the maps server per call and tears it down after
//! - `StaticCommuteBackend`: canned responses for tests and offline runs
//! - `CommuteOutcome`: tagged result, parsed matrix vs passthrough text vs failure

mod backend;
mod client;
mod mcp;
mod outcome;

pub use backend::{CommuteBackend, StaticCommuteBackend};
pub use client::CommuteClient;
pub use mcp::{MapsServerSettings, McpDistanceMatrix};
pub use outcome::CommuteOutcome;

use aptscout_core::DomainError;
use thiserror::Error;

/// Everything that can go wrong between a commute request and a maps response.
#[derive(Debug, Error)]
pub enum CommuteError {
    #[error("invalid commute request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("maps API key is not configured (set APTSCOUT_MAPS_API_KEY or GOOGLE_MAPS_API_KEY)")]
    MissingCredential,

    #[error("failed to start maps server `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    #[error("maps server handshake failed: {0}")]
    Handshake(String),

    #[error("could not list maps server tools: {0}")]
    ListTools(String),

    #[error("maps server does not offer the `{0}` tool")]
    ToolUnavailable(String),

    #[error("distance matrix call failed: {0}")]
    Call(String),

    #[error("maps server returned no text content")]
    EmptyResponse,

    #[error("maps server did not answer within {0}s")]
    Timeout(u64),
}

impl CommuteError {
    /// Stable machine-readable class used in CLI and tool payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::InvalidRequest(error) => error.error_class(),
            Self::MissingCredential => "missing_credential",
            Self::Spawn { .. } | Self::Handshake(_) | Self::ListTools(_) => "transport",
            Self::ToolUnavailable(_) => "tool_unavailable",
            Self::Call(_) | Self::EmptyResponse => "upstream",
            Self::Timeout(_) => "timeout",
        }
    }
}
