use std::collections::BTreeMap;

use anyhow::{Context, Result};
use aptscout_commute::{CommuteClient, CommuteOutcome};
use aptscout_core::TravelMode;
use aptscout_inventory::InventoryService;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Text returned to the caller of a tool, plus whether it describes a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema object describing `execute`'s input.
    fn input_schema(&self) -> Value;
    /// Errors only on malformed input. Domain failures come back as output.
    async fn execute(&self, input: Value) -> Result<ToolOutput>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// Registered tools in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.values().map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Registry with the two tools the orchestration layer calls into.
pub fn default_registry(inventory: InventoryService, commute: CommuteClient) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(FetchApartmentsTool::new(inventory));
    registry.register(CheckCommutesTool::new(commute));
    registry
}

#[derive(Debug, Deserialize)]
struct FetchApartmentsInput {
    city: String,
    state: String,
    max_budget: f64,
}

pub struct FetchApartmentsTool {
    service: InventoryService,
}

impl FetchApartmentsTool {
    pub fn new(service: InventoryService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for FetchApartmentsTool {
    fn name(&self) -> &'static str {
        "fetch_apartments"
    }

    fn description(&self) -> &'static str {
        "Find up to 5 apartments in a city and state at or under a monthly budget. \
         Returns a JSON array of listings with id, agent_description, monthly_price, address, \
         city, state, latitude and longitude, or a JSON object explaining why nothing was found."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string", "description": "Target city, e.g. Austin" },
                "state": { "type": "string", "description": "Target state abbreviation, e.g. TX" },
                "max_budget": {
                    "type": "number",
                    "minimum": 0,
                    "description": "Maximum monthly rent in dollars"
                }
            },
            "required": ["city", "state", "max_budget"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let input: FetchApartmentsInput =
            serde_json::from_value(input).context("invalid fetch_apartments input")?;

        let outcome = self.service.fetch_apartments(&input.city, &input.state, input.max_budget);
        Ok(ToolOutput { text: outcome.render(), is_error: outcome.is_unavailable() })
    }
}

#[derive(Debug, Deserialize)]
struct CheckCommutesInput {
    origins: Vec<String>,
    destination: String,
    #[serde(default)]
    mode: Option<String>,
}

pub struct CheckCommutesTool {
    client: CommuteClient,
}

impl CheckCommutesTool {
    pub fn new(client: CommuteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CheckCommutesTool {
    fn name(&self) -> &'static str {
        "check_commutes"
    }

    fn description(&self) -> &'static str {
        "Distance and travel time from several origins to one destination in a single batch. \
         Origins are \"lat,lng\" strings. Returns compact JSON from the maps service, its raw \
         text when it is not JSON, or an error line."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "origins": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 1,
                    "description": "Origin coordinates as \"lat,lng\""
                },
                "destination": {
                    "type": "string",
                    "description": "Landmark or address; append city and state to disambiguate"
                },
                "mode": {
                    "type": "string",
                    "enum": ["driving", "transit", "walking", "bicycling"],
                    "default": "driving"
                }
            },
            "required": ["origins", "destination"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let input: CheckCommutesInput =
            serde_json::from_value(input).context("invalid check_commutes input")?;

        let mode = match input.mode.as_deref() {
            None => TravelMode::default(),
            Some(raw) => match raw.parse::<TravelMode>() {
                Ok(mode) => mode,
                Err(error) => {
                    let outcome = CommuteOutcome::Failed(error.into());
                    return Ok(ToolOutput { text: outcome.payload(), is_error: true });
                }
            },
        };

        let outcome = self.client.check_commutes(input.origins, &input.destination, mode).await;
        Ok(ToolOutput { text: outcome.payload(), is_error: outcome.is_failure() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aptscout_commute::{CommuteClient, StaticCommuteBackend};
    use aptscout_core::TravelMode;
    use aptscout_inventory::{fixtures, InventoryService, ListingStore};
    use serde_json::{json, Value};

    use super::{default_registry, ToolRegistry};

    fn registry_with(backend: Arc<StaticCommuteBackend>) -> ToolRegistry {
        default_registry(
            InventoryService::new(Arc::new(fixtures::fixture_store())),
            CommuteClient::new(backend),
        )
    }

    #[test]
    fn default_registry_exposes_both_tools_in_name_order() {
        let registry = registry_with(Arc::new(StaticCommuteBackend::text("{}")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["check_commutes", "fetch_apartments"]);
        for tool in registry.iter() {
            assert_eq!(tool.input_schema()["type"], "object");
        }
    }

    #[tokio::test]
    async fn fetch_apartments_returns_listing_records() {
        let registry = registry_with(Arc::new(StaticCommuteBackend::text("{}")));
        let tool = registry.get("fetch_apartments").expect("tool registered");

        let output = tool
            .execute(json!({ "city": "Dallas", "state": "tx", "max_budget": 2000 }))
            .await
            .expect("valid input");

        assert!(!output.is_error);
        let records: Value = serde_json::from_str(&output.text).expect("JSON output");
        assert_eq!(records[0]["id"], "1009");
        assert_eq!(records.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn fetch_apartments_reports_unavailable_inventory() {
        let registry = default_registry(
            InventoryService::new(Arc::new(ListingStore::empty())),
            CommuteClient::new(Arc::new(StaticCommuteBackend::text("{}"))),
        );
        let tool = registry.get("fetch_apartments").expect("tool registered");

        let output = tool
            .execute(json!({ "city": "Austin", "state": "TX", "max_budget": 2500 }))
            .await
            .expect("valid input");

        assert!(output.is_error);
        assert_eq!(output.text, r#"{"error":"Database is unavailable."}"#);
    }

    #[tokio::test]
    async fn fetch_apartments_rejects_malformed_input() {
        let registry = registry_with(Arc::new(StaticCommuteBackend::text("{}")));
        let tool = registry.get("fetch_apartments").expect("tool registered");

        let result = tool.execute(json!({ "city": "Austin", "max_budget": "cheap" })).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn check_commutes_defaults_to_driving() {
        let backend = Arc::new(StaticCommuteBackend::text(r#"{"rows":[{"elements":[]}]}"#));
        let registry = registry_with(backend.clone());
        let tool = registry.get("check_commutes").expect("tool registered");

        let output = tool
            .execute(json!({
                "origins": ["30.2672,-97.7431"],
                "destination": "Austin-Bergstrom International Airport"
            }))
            .await
            .expect("valid input");

        assert!(!output.is_error);
        assert_eq!(output.text, r#"{"rows":[{"elements":[]}]}"#);
        assert_eq!(backend.requests()[0].mode(), TravelMode::Driving);
    }

    #[tokio::test]
    async fn check_commutes_with_unknown_mode_fails_softly() {
        let backend = Arc::new(StaticCommuteBackend::text("{}"));
        let registry = registry_with(backend.clone());
        let tool = registry.get("check_commutes").expect("tool registered");

        let output = tool
            .execute(json!({
                "origins": ["30.2672,-97.7431"],
                "destination": "Airport",
                "mode": "hovercraft"
            }))
            .await
            .expect("well-formed input");

        assert!(output.is_error);
        assert!(output.text.contains("unsupported travel mode `hovercraft`"));
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let registry = registry_with(Arc::new(StaticCommuteBackend::text("{}")));
        assert!(registry.get("maps_distance_matrix").is_none());
    }
}
