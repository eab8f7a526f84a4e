//! Deterministic inventory fixture shared by unit and integration tests
//! across the workspace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::store::ListingStore;

/// Eleven listings: seven in Austin, TX (three at or under $2000), one in
/// Austin, MN, and a handful elsewhere. Extra columns mirror the raw export.
pub const FIXTURE_CSV: &str = "\
id,category,agent_description,body,monthly_price,address,city,state,latitude,longitude
1001,apartment,\"Downtown loft, walk to Congress Ave\",Long listing body,2200,100 Congress Ave,Austin,TX,30.2672,-97.7431
1002,apartment,South Congress one bedroom,Long listing body,1850,1500 S Congress Ave,Austin,TX,30.2422,-97.7552
1003,apartment,Penthouse with lake view,Long listing body,2600,50 Rainey St,Austin,TX,30.2577,-97.7386
1004,apartment,Compact studio near campus,Long listing body,1400,2400 Guadalupe St,austin,tx,30.2884,-97.7420
1005,apartment,Two bedroom at The Domain,Long listing body,2450,11500 Rock Rose Ave,Austin,TX,30.4015,-97.7195
1006,home,Duplex half with yard,Long listing body,2100,4100 Avenue D,Austin,TX,,
1007,apartment,East side garden unit,Long listing body,1999,1900 E 6th St,Austin,TX,30.2620,-97.7230
1008,apartment,Mueller townhome,Long listing body,2300,1800 Simond Ave,Austin,TX,30.2986,-97.7055
1009,apartment,Uptown Dallas one bedroom,Long listing body,1500,2500 McKinney Ave,Dallas,TX,32.7990,-96.8010
1010,apartment,Quiet flat near Hormel,Long listing body,1700,500 4th Ave NE,Austin,MN,43.6666,-92.9746
1011,apartment,Pearl district loft,Long listing body,3100,303 Pearl Pkwy,San Antonio,TX,29.4430,-98.4800
";

pub const FIXTURE_FILE_NAME: &str = "apartments_cleaned.csv";

pub fn fixture_store() -> ListingStore {
    ListingStore::from_reader(FIXTURE_CSV.as_bytes()).unwrap_or_default()
}

/// Writes the fixture CSV into `dir` and returns its path.
pub fn write_fixture(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(FIXTURE_FILE_NAME);
    fs::write(&path, FIXTURE_CSV)?;
    Ok(path)
}
