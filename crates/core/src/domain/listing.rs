use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rental unit as it appears in the cleaned dataset.
///
/// Field names on the wire match the dataset columns, so the same type is
/// used to read CSV rows and to emit tool payloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    #[serde(rename = "agent_description")]
    pub description: String,
    pub monthly_price: f64,
    pub address: String,
    pub city: String,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Listing {
    /// `"<lat>,<lng>"` when both coordinates are known.
    pub fn coordinate(&self) -> Option<String> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(format!("{latitude},{longitude}")),
            _ => None,
        }
    }
}

/// Comparison key for free-text location fields.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Commute origins for a set of listings, skipping listings without coordinates.
pub fn origins_for(listings: &[Listing]) -> Vec<String> {
    listings.iter().filter_map(Listing::coordinate).collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_key, origins_for, Listing, ListingId};

    fn listing(id: &str, latitude: Option<f64>, longitude: Option<f64>) -> Listing {
        Listing {
            id: ListingId(id.to_owned()),
            description: "Sunny one bedroom near the river".to_owned(),
            monthly_price: 2200.0,
            address: "100 Congress Ave".to_owned(),
            city: "Austin".to_owned(),
            state: "TX".to_owned(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn coordinate_formats_lat_lng_pair() {
        let item = listing("1", Some(30.2672), Some(-97.7431));
        assert_eq!(item.coordinate().as_deref(), Some("30.2672,-97.7431"));
    }

    #[test]
    fn coordinate_is_absent_when_either_half_is_missing() {
        assert_eq!(listing("1", None, Some(-97.7431)).coordinate(), None);
        assert_eq!(listing("1", Some(30.2672), None).coordinate(), None);
    }

    #[test]
    fn origins_skip_listings_without_coordinates() {
        let listings = vec![
            listing("1", Some(30.2672), Some(-97.7431)),
            listing("2", None, None),
            listing("3", Some(30.4015), Some(-97.7195)),
        ];

        assert_eq!(origins_for(&listings), vec!["30.2672,-97.7431", "30.4015,-97.7195"]);
    }

    #[test]
    fn normalize_key_trims_and_lowercases() {
        assert_eq!(normalize_key("  San Antonio "), "san antonio");
        assert_eq!(normalize_key("TX"), "tx");
    }

    #[test]
    fn listing_serializes_with_dataset_column_names() {
        let value = serde_json::to_value(listing("42", None, None)).expect("serialize listing");

        assert_eq!(value["id"], "42");
        assert_eq!(value["agent_description"], "Sunny one bedroom near the river");
        assert!(value["latitude"].is_null());
    }
}
