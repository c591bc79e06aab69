use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::listing::Listing;
use crate::domain::search_params::SearchParams;
use crate::error::Result;
use crate::ports::marketplace_client::MarketplaceClient;

type SearchFn = Box<dyn Fn(&SearchParams) -> Result<Vec<Listing>> + Send + Sync>;
type DetailFn = Box<dyn Fn(&str) -> Result<Option<Listing>> + Send + Sync>;
type ListFn = Box<dyn Fn() -> Result<Vec<String>> + Send + Sync>;

#[allow(clippy::struct_field_names)]
pub struct MockMarketplaceClient {
    search_fn: Mutex<SearchFn>,
    detail_fn: Mutex<DetailFn>,
    categories_fn: Mutex<ListFn>,
    locations_fn: Mutex<ListFn>,
}

impl Default for MockMarketplaceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketplaceClient {
    pub fn new() -> Self {
        Self {
            search_fn: Mutex::new(Box::new(|_| Ok(vec![]))),
            detail_fn: Mutex::new(Box::new(|id| Ok(Some(make_listing(id, "Test Listing"))))),
            categories_fn: Mutex::new(Box::new(|| Ok(vec!["Furniture".into()]))),
            locations_fn: Mutex::new(Box::new(|| Ok(vec!["Valletta".into()]))),
        }
    }

    #[must_use]
    pub fn with_search(
        self,
        f: impl Fn(&SearchParams) -> Result<Vec<Listing>> + Send + Sync + 'static,
    ) -> Self {
        *self.search_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_detail(
        self,
        f: impl Fn(&str) -> Result<Option<Listing>> + Send + Sync + 'static,
    ) -> Self {
        *self.detail_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_categories(
        self,
        f: impl Fn() -> Result<Vec<String>> + Send + Sync + 'static,
    ) -> Self {
        *self.categories_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_locations(
        self,
        f: impl Fn() -> Result<Vec<String>> + Send + Sync + 'static,
    ) -> Self {
        *self.locations_fn.lock().unwrap() = Box::new(f);
        self
    }
}

#[async_trait]
impl MarketplaceClient for MockMarketplaceClient {
    async fn search_listings(&self, params: &SearchParams) -> Result<Vec<Listing>> {
        let f = self.search_fn.lock().unwrap();
        f(params)
    }

    async fn get_listing_details(&self, id: &str) -> Result<Option<Listing>> {
        let f = self.detail_fn.lock().unwrap();
        f(id)
    }

    async fn get_categories(&self) -> Result<Vec<String>> {
        let f = self.categories_fn.lock().unwrap();
        f()
    }

    async fn get_locations(&self) -> Result<Vec<String>> {
        let f = self.locations_fn.lock().unwrap();
        f()
    }
}

// --- Factory functions ---

pub fn make_listing(id: &str, title: &str) -> Listing {
    Listing {
        id: id.to_string(),
        title: title.to_string(),
        price: Some("€10".to_string()),
        location: Some("Valletta".to_string()),
        category: Some("Other".to_string()),
        description: None,
        images: vec![],
        date_posted: None,
        contact_info: None,
        url: format!("http://www.secondhand.com.mt/listing/{id}"),
    }
}
