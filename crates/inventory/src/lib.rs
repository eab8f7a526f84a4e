//! Apartment inventory: a read-only listing table loaded once at startup and
//! the location/budget query that runs against it.

pub mod dataset;
pub mod fixtures;
pub mod service;
pub mod store;

pub use dataset::{DatasetError, REQUIRED_COLUMNS};
pub use service::{InventoryOutcome, InventoryService, MAX_RESULTS};
pub use store::ListingStore;
