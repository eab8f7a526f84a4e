use std::sync::Arc;

use aptscout_inventory::{InventoryService, ListingStore};

use crate::commands::{load_config, CommandResult};

pub const EXIT_UNAVAILABLE: u8 = 3;

pub fn run(city: &str, state: &str, max_budget: f64) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("search", &error),
    };

    let store = ListingStore::load_or_empty(&config.dataset.path);
    let outcome = InventoryService::new(Arc::new(store)).fetch_apartments(city, state, max_budget);

    let exit_code = if outcome.is_unavailable() { EXIT_UNAVAILABLE } else { 0 };
    CommandResult::raw(exit_code, outcome.render())
}
