//! Aptscout MCP server.
//!
//! Publishes `fetch_apartments` and `check_commutes` to an orchestrating agent
//! over stdio. Stdout carries the protocol, so logs always go to stderr.
//!
//! ```no_run
//! use aptscout_core::{AppConfig, LoadOptions};
//! use aptscout_mcp::AptscoutMcpServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(LoadOptions::default())?;
//!     AptscoutMcpServer::from_config(&config).run_stdio().await
//! }
//! ```

mod server;

pub use aptscout_core::init_logging;
pub use server::AptscoutMcpServer;
