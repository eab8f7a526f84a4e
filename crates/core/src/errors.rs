use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("at least one origin coordinate is required")]
    EmptyOrigins,
    #[error("origin `{origin}` is not a `<lat>,<lng>` coordinate pair")]
    InvalidOrigin { origin: String },
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("unsupported travel mode `{0}` (expected driving|transit|walking|bicycling)")]
    UnsupportedTravelMode(String),
}

impl DomainError {
    /// Stable machine-readable class used in CLI and tool payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::EmptyOrigins | Self::InvalidOrigin { .. } => "invalid_origin",
            Self::EmptyDestination => "invalid_destination",
            Self::UnsupportedTravelMode(_) => "invalid_mode",
        }
    }
}
