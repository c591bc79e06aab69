pub mod cache;
pub mod catalog;
pub mod fetcher;
pub mod sources;
