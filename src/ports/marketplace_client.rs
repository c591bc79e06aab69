use async_trait::async_trait;

use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::error::Result;

#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    async fn search_listings(&self, params: &SearchParams) -> Result<Vec<Listing>>;
    async fn get_listing_details(&self, id: &str) -> Result<Option<Listing>>;
    async fn get_categories(&self) -> Result<Vec<String>>;
    async fn get_locations(&self) -> Result<Vec<String>>;
}
