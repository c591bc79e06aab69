use async_trait::async_trait;

use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::error::Result;

/// Where listings come from. The catalog service caches and filters
/// whatever a source returns.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Candidate listings for a search, before local filtering.
    async fn candidates(&self, params: &SearchParams) -> Result<Vec<Listing>>;

    /// A single listing, or `None` when the source has no such id.
    async fn listing(&self, id: &str) -> Result<Option<Listing>>;

    async fn categories(&self) -> Result<Vec<String>>;

    async fn locations(&self) -> Result<Vec<String>>;
}
