pub mod client;
pub mod listing_parser;
pub mod rate_limiter;
