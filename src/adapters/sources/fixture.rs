use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use crate::adapters::fetcher::listing_parser::listing_url;
use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::domain::taxonomy;
use crate::error::Result;
use crate::ports::listing_source::ListingSource;

/// Built-in sample data used when live fetching is disabled.
///
/// `listing` answers for any id with a placeholder record; it never reports
/// a listing as missing.
pub struct FixtureSource {
    base_url: String,
}

impl FixtureSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn sample_listings(&self) -> Vec<Listing> {
        let posted = now_iso();
        vec![
            Listing {
                id: "mock-1".into(),
                title: "Sample Furniture Item".into(),
                price: Some("€150".into()),
                location: Some("Valletta".into()),
                category: Some("Furniture".into()),
                description: Some(
                    "This is a sample listing - actual implementation would scrape real data"
                        .into(),
                ),
                images: Vec::new(),
                date_posted: Some(posted.clone()),
                contact_info: None,
                url: listing_url(&self.base_url, "mock-1"),
            },
            Listing {
                id: "mock-2".into(),
                title: "Electronics Item".into(),
                price: Some("€75".into()),
                location: Some("Sliema".into()),
                category: Some("Electronics".into()),
                description: Some("Another sample listing for demonstration".into()),
                images: Vec::new(),
                date_posted: Some(posted),
                contact_info: None,
                url: listing_url(&self.base_url, "mock-2"),
            },
        ]
    }
}

#[async_trait]
impl ListingSource for FixtureSource {
    async fn candidates(&self, _params: &SearchParams) -> Result<Vec<Listing>> {
        Ok(self.sample_listings())
    }

    async fn listing(&self, id: &str) -> Result<Option<Listing>> {
        Ok(Some(Listing {
            id: id.to_string(),
            title: format!("Detailed view of listing {id}"),
            price: Some("€100".into()),
            location: Some("Malta".into()),
            category: Some("General".into()),
            description: Some("Detailed description would be scraped from the actual page".into()),
            images: Vec::new(),
            date_posted: Some(now_iso()),
            contact_info: Some("Contact information would be extracted here".into()),
            url: listing_url(&self.base_url, id),
        }))
    }

    async fn categories(&self) -> Result<Vec<String>> {
        Ok(taxonomy::categories())
    }

    async fn locations(&self) -> Result<Vec<String>> {
        Ok(taxonomy::locations())
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
