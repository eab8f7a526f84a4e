use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use aptscout_core::{normalize_key, Listing};
use tracing::{info, warn};

use crate::dataset::{self, DatasetError, ParsedDataset};

#[derive(Clone, Debug)]
struct StoredListing {
    listing: Listing,
    city_key: String,
    state_key: String,
}

/// Read-only, in-memory listing table. Built once, then shared behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct ListingStore {
    entries: Vec<StoredListing>,
}

impl ListingStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from already-parsed listings. Later duplicates of an id are dropped.
    pub fn from_listings(listings: impl IntoIterator<Item = Listing>) -> Self {
        let mut seen_ids = HashSet::new();
        let entries = listings
            .into_iter()
            .filter(|listing| seen_ids.insert(listing.id.clone()))
            .map(|listing| StoredListing {
                city_key: normalize_key(&listing.city),
                state_key: normalize_key(&listing.state),
                listing,
            })
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let store = Self::from_parsed(dataset::read_path(path)?);
        info!(
            event_name = "inventory.dataset.loaded",
            path = %path.display(),
            listings = store.len(),
            "apartment dataset loaded"
        );
        Ok(store)
    }

    /// Loads the dataset, degrading to an empty store when it cannot be read.
    ///
    /// An empty store makes every query report the inventory as unavailable,
    /// so a missing file never takes the host process down.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => store,
            Err(error) => {
                warn!(
                    event_name = "inventory.dataset.unavailable",
                    path = %path.display(),
                    %error,
                    "apartment dataset could not be loaded; serving an empty inventory"
                );
                Self::empty()
            }
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Ok(Self::from_parsed(dataset::read_csv(reader)?))
    }

    fn from_parsed(parsed: ParsedDataset) -> Self {
        let rows = parsed.listings.len();
        let store = Self::from_listings(parsed.listings);
        if store.len() < rows {
            warn!(
                event_name = "inventory.dataset.duplicate_ids",
                duplicate_ids = rows - store.len(),
                "dataset rows with an already-seen id were dropped"
            );
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.entries.iter().map(|entry| &entry.listing)
    }

    /// Listings in dataset order whose normalized city and state equal the given keys
    /// and whose price does not exceed `max_budget`.
    pub fn matching<'a>(
        &'a self,
        city_key: &'a str,
        state_key: &'a str,
        max_budget: f64,
    ) -> impl Iterator<Item = &'a Listing> + 'a {
        self.entries
            .iter()
            .filter(move |entry| {
                entry.city_key == city_key
                    && entry.state_key == state_key
                    && entry.listing.monthly_price <= max_budget
            })
            .map(|entry| &entry.listing)
    }
}
