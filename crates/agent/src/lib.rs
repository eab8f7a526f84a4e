//! Tool surface for the apartment-search agent pipeline.
//!
//! The language-model orchestration (manager, analyst, reviewer, summarizer)
//! lives outside this workspace. It reaches the inventory and the commute
//! client only through the tools registered here:
//!
//! - `fetch_apartments(city, state, max_budget)` returns JSON
//! - `check_commutes(origins, destination, mode)` returns JSON, or passthrough text
//!
//! Tools never fail on domain conditions (empty dataset, no matches, maps
//! outages). Those come back as output text with `is_error` set where it
//! applies. Only malformed input is an `Err`.

pub mod tools;

pub use tools::{
    default_registry, CheckCommutesTool, FetchApartmentsTool, Tool, ToolOutput, ToolRegistry,
};
