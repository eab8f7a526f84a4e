pub mod commute;
pub mod listing;
