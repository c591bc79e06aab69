pub mod listing;
pub mod search_params;
pub mod taxonomy;
