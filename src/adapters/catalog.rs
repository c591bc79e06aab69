use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::error::{MarketplaceError, Result};
use crate::ports::cache::ListingCache;
use crate::ports::listing_source::ListingSource;
use crate::ports::marketplace_client::MarketplaceClient;

/// Cache-first query service over a [`ListingSource`].
///
/// Every operation looks up a deterministic key first and stores a fresh
/// result with the configured TTL on a miss.
pub struct CatalogService {
    source: Arc<dyn ListingSource>,
    cache: Arc<dyn ListingCache>,
    ttl: Duration,
}

impl CatalogService {
    pub fn new(
        source: Arc<dyn ListingSource>,
        cache: Arc<dyn ListingCache>,
        ttl: Duration,
    ) -> Self {
        Self { source, cache, ttl }
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.cache.set(key, &json, self.ttl),
            Err(e) => tracing::warn!(key, error = %e, "Skipping cache write for unencodable value"),
        }
    }
}

#[async_trait]
impl MarketplaceClient for CatalogService {
    async fn search_listings(&self, params: &SearchParams) -> Result<Vec<Listing>> {
        let cache_key = format!("search:{}", serde_json::to_string(params)?);
        if let Some(listings) = self.cached(&cache_key) {
            return Ok(listings);
        }

        let candidates = self.source.candidates(params).await?;
        let listings = params.apply(candidates);

        self.store(&cache_key, &listings);
        Ok(listings)
    }

    async fn get_listing_details(&self, id: &str) -> Result<Option<Listing>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(MarketplaceError::InvalidParams {
                reason: "listingId is required".into(),
            });
        }

        let cache_key = format!("listing:{id}");
        if let Some(listing) = self.cached::<Listing>(&cache_key) {
            return Ok(Some(listing));
        }

        // Misses are not cached, so a listing that appears later is found.
        let listing = self.source.listing(id).await?;
        if let Some(ref listing) = listing {
            self.store(&cache_key, listing);
        }
        Ok(listing)
    }

    async fn get_categories(&self) -> Result<Vec<String>> {
        if let Some(categories) = self.cached("categories") {
            return Ok(categories);
        }
        let categories = self.source.categories().await?;
        self.store("categories", &categories);
        Ok(categories)
    }

    async fn get_locations(&self) -> Result<Vec<String>> {
        if let Some(locations) = self.cached("locations") {
            return Ok(locations);
        }
        let locations = self.source.locations().await?;
        self.store("locations", &locations);
        Ok(locations)
    }
}
