use std::sync::Arc;

use aptscout_core::{normalize_key, Listing};
use serde_json::{json, Value};
use tracing::debug;

use crate::store::ListingStore;

/// Upper bound on listings returned by a single query.
pub const MAX_RESULTS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub enum InventoryOutcome {
    /// The dataset failed to load or holds no rows.
    Unavailable,
    /// Well-formed query, nothing matched. Carries the query as given.
    NoResults { city: String, state: String, max_budget: f64 },
    /// Between one and [`MAX_RESULTS`] listings, in dataset order.
    Matches(Vec<Listing>),
}

impl InventoryOutcome {
    pub fn listings(&self) -> &[Listing] {
        match self {
            Self::Matches(listings) => listings,
            Self::Unavailable | Self::NoResults { .. } => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// JSON shape handed to the orchestration layer.
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Unavailable => json!({ "error": "Database is unavailable." }),
            Self::NoResults { city, state, max_budget } => json!({
                "message": format!("No apartments found in {city}, {state} under ${max_budget}."),
                "count": 0,
                "city": city,
                "state": state,
                "max_budget": max_budget,
            }),
            Self::Matches(listings) => Value::Array(listings.iter().map(listing_record).collect()),
        }
    }

    /// Compact JSON text of [`Self::to_payload`].
    pub fn render(&self) -> String {
        self.to_payload().to_string()
    }
}

fn listing_record(listing: &Listing) -> Value {
    json!({
        "id": listing.id.0,
        "agent_description": listing.description,
        "monthly_price": listing.monthly_price,
        "address": listing.address,
        "city": listing.city,
        "state": listing.state,
        "latitude": listing.latitude,
        "longitude": listing.longitude,
    })
}

#[derive(Clone, Debug)]
pub struct InventoryService {
    store: Arc<ListingStore>,
}

impl InventoryService {
    pub fn new(store: Arc<ListingStore>) -> Self {
        Self { store }
    }

    pub fn fetch_apartments(&self, city: &str, state: &str, max_budget: f64) -> InventoryOutcome {
        if self.store.is_empty() {
            debug!(event_name = "inventory.query.unavailable", "inventory query on empty dataset");
            return InventoryOutcome::Unavailable;
        }

        let city_key = normalize_key(city);
        let state_key = normalize_key(state);
        let matches: Vec<Listing> = self
            .store
            .matching(&city_key, &state_key, max_budget)
            .take(MAX_RESULTS)
            .cloned()
            .collect();

        debug!(
            event_name = "inventory.query.completed",
            city = %city_key,
            state = %state_key,
            max_budget,
            matched = matches.len(),
            "inventory query completed"
        );

        if matches.is_empty() {
            return InventoryOutcome::NoResults {
                city: city.to_string(),
                state: state.to_string(),
                max_budget,
            };
        }

        InventoryOutcome::Matches(matches)
    }
}
