use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use aptscout_core::Listing;
use thiserror::Error;
use tracing::{debug, warn};

/// Columns the cleaned dataset must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "agent_description",
    "monthly_price",
    "address",
    "city",
    "state",
    "latitude",
    "longitude",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not open dataset `{path}`: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("could not read dataset header: {0}")]
    Header(#[source] csv::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Rows read from a dataset, in file order, plus how many could not be parsed.
/// Duplicate ids are kept here; [`crate::ListingStore::from_listings`] drops them.
#[derive(Debug, Default)]
pub struct ParsedDataset {
    pub listings: Vec<Listing>,
    pub skipped_rows: usize,
}

pub fn read_path(path: &Path) -> Result<ParsedDataset, DatasetError> {
    let file = File::open(path)
        .map_err(|source| DatasetError::Open { path: path.to_path_buf(), source })?;
    read_csv(file)
}

pub fn read_csv<R: Read>(reader: R) -> Result<ParsedDataset, DatasetError> {
    let mut reader =
        csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::Headers).from_reader(reader);

    let headers = reader.headers().map_err(DatasetError::Header)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut parsed = ParsedDataset::default();

    for (index, row) in reader.deserialize::<Listing>().enumerate() {
        let listing = match row {
            Ok(listing) => listing,
            Err(error) => {
                // header is line 1
                debug!(line = index + 2, %error, "skipping unreadable dataset row");
                parsed.skipped_rows += 1;
                continue;
            }
        };

        parsed.listings.push(listing);
    }

    if parsed.skipped_rows > 0 {
        warn!(
            event_name = "inventory.dataset.rows_skipped",
            skipped_rows = parsed.skipped_rows,
            "some dataset rows could not be parsed"
        );
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{read_csv, DatasetError};

    #[test]
    fn reads_required_columns_and_ignores_extras() {
        let csv = "\
id,category,agent_description,body,monthly_price,address,city,state,latitude,longitude
7,apartment,Bright studio,very long body text,1450.5,12 Oak St,Austin,TX,30.1,-97.7
";
        let parsed = read_csv(csv.as_bytes()).expect("dataset should parse");

        assert_eq!(parsed.listings.len(), 1);
        let listing = &parsed.listings[0];
        assert_eq!(listing.id.0, "7");
        assert_eq!(listing.description, "Bright studio");
        assert_eq!(listing.monthly_price, 1450.5);
        assert_eq!(listing.latitude, Some(30.1));
    }

    #[test]
    fn empty_coordinates_load_as_absent() {
        let csv = "\
id,agent_description,monthly_price,address,city,state,latitude,longitude
8,No geo,900,,Austin,TX,,
";
        let parsed = read_csv(csv.as_bytes()).expect("dataset should parse");

        assert_eq!(parsed.listings[0].latitude, None);
        assert_eq!(parsed.listings[0].longitude, None);
        assert_eq!(parsed.listings[0].address, "");
    }

    #[test]
    fn missing_columns_are_reported_by_name() {
        let csv = "id,agent_description,monthly_price,city,state\n1,x,100,Austin,TX\n";

        match read_csv(csv.as_bytes()) {
            Err(DatasetError::MissingColumns(columns)) => {
                assert_eq!(columns, vec!["address", "latitude", "longitude"]);
            }
            other => panic!("expected missing columns error, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_rows_are_skipped_and_duplicates_left_to_the_store() {
        let csv = "\
id,agent_description,monthly_price,address,city,state,latitude,longitude
1,First,1000,1 A St,Austin,TX,30.1,-97.7
2,Call for price,call us,2 B St,Austin,TX,30.2,-97.7
1,Duplicate of first,1100,3 C St,Austin,TX,30.3,-97.7
3,Third,1200,4 D St,Austin,TX,30.4,-97.7
";
        let parsed = read_csv(csv.as_bytes()).expect("dataset should parse");

        let ids: Vec<&str> = parsed.listings.iter().map(|listing| listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["1", "1", "3"]);
        assert_eq!(parsed.skipped_rows, 1);
        assert_eq!(parsed.listings[0].description, "First");
    }
}
