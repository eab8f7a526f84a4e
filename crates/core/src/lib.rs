pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::commute::{CommuteRequest, TravelMode};
pub use domain::listing::{normalize_key, origins_for, Listing, ListingId};
pub use errors::DomainError;
pub use logging::{init_logging, LoggingInitError};
