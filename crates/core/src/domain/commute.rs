use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Transit,
    Walking,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Transit => "transit",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Self::Driving),
            "transit" => Ok(Self::Transit),
            "walking" => Ok(Self::Walking),
            "bicycling" => Ok(Self::Bicycling),
            other => Err(DomainError::UnsupportedTravelMode(other.to_string())),
        }
    }
}

/// A validated batch of origins against a single destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommuteRequest {
    origins: Vec<String>,
    destination: String,
    mode: TravelMode,
}

impl CommuteRequest {
    pub fn new(
        origins: Vec<String>,
        destination: impl Into<String>,
        mode: TravelMode,
    ) -> Result<Self, DomainError> {
        if origins.is_empty() {
            return Err(DomainError::EmptyOrigins);
        }

        let origins = origins
            .into_iter()
            .map(|origin| {
                let trimmed = origin.trim();
                if is_coordinate_pair(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(DomainError::InvalidOrigin { origin })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(DomainError::EmptyDestination);
        }

        Ok(Self { origins, destination, mode })
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    /// Arguments for the maps server's distance-matrix tool. All origins go in one call.
    pub fn arguments(&self) -> Map<String, Value> {
        let mut arguments = Map::new();
        arguments.insert("origins".to_string(), json!(self.origins));
        arguments.insert("destinations".to_string(), json!([self.destination]));
        arguments.insert("mode".to_string(), json!(self.mode.as_str()));
        arguments
    }
}

fn is_coordinate_pair(value: &str) -> bool {
    let Some((latitude, longitude)) = value.split_once(',') else {
        return false;
    };

    let latitude = latitude.trim().parse::<f64>();
    let longitude = longitude.trim().parse::<f64>();
    match (latitude, longitude) {
        (Ok(latitude), Ok(longitude)) => {
            latitude.is_finite()
                && longitude.is_finite()
                && (-90.0..=90.0).contains(&latitude)
                && (-180.0..=180.0).contains(&longitude)
        }
        _ => false,
    }
}
