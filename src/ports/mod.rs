pub mod cache;
pub mod listing_source;
pub mod marketplace_client;
