use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::adapters::fetcher::client::HttpFetcher;
use crate::adapters::fetcher::listing_parser;
use crate::config::types::ScraperConfig;
use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::domain::taxonomy;
use crate::error::{MarketplaceError, Result};
use crate::ports::listing_source::ListingSource;

/// Fetches and parses the marketplace's own pages.
pub struct LiveSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl LiveSource {
    pub fn new(config: &ScraperConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self {
            fetcher: HttpFetcher::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Filter `<select>` options on the home page, or `fallback` when the
    /// page has none.
    async fn home_options(
        &self,
        name: &str,
        fallback: fn() -> Vec<String>,
    ) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(&self.base_url).await?;
        let options = listing_parser::parse_select_options(&html, name)?;
        if options.is_empty() {
            warn!(name, "No filter options found on home page, using built-in list");
            return Ok(fallback());
        }
        Ok(options)
    }
}

#[async_trait]
impl ListingSource for LiveSource {
    async fn candidates(&self, params: &SearchParams) -> Result<Vec<Listing>> {
        let url = build_search_url(&self.base_url, params)?;
        let html = self.fetcher.fetch(&url).await?;
        let listings = listing_parser::parse_search_results(&html, &self.base_url)?;
        debug!(count = listings.len(), "Parsed search results");
        Ok(listings)
    }

    async fn listing(&self, id: &str) -> Result<Option<Listing>> {
        let url = listing_parser::listing_url(&self.base_url, id);
        match self.fetcher.fetch(&url).await {
            Ok(html) => listing_parser::parse_listing_detail(&html, id, &self.base_url).map(Some),
            Err(MarketplaceError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn categories(&self) -> Result<Vec<String>> {
        self.home_options("category", taxonomy::categories).await
    }

    async fn locations(&self) -> Result<Vec<String>> {
        self.home_options("location", taxonomy::locations).await
    }
}

fn build_search_url(base_url: &str, params: &SearchParams) -> Result<String> {
    let mut url = Url::parse(&format!("{base_url}/search"))?;
    let pairs = params.to_query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(&pairs);
    }
    Ok(url.to_string())
}
