use serde::{Deserialize, Serialize};

use crate::domain::listing::Listing;

/// Filters for a listing search. Every field is optional and an
/// absent field places no constraint on the results.
///
/// `min_price` and `max_price` are accepted and take part in the cache key,
/// but they are never applied as filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchParams {
    /// Narrow `candidates` conjunctively: query, then category, then
    /// location, then truncate to `limit`. A `limit` of zero means no limit.
    pub fn apply(&self, candidates: Vec<Listing>) -> Vec<Listing> {
        let mut filtered: Vec<Listing> = candidates
            .into_iter()
            .filter(|l| non_empty(self.query.as_deref()).is_none_or(|q| l.mentions(q)))
            .filter(|l| non_empty(self.category.as_deref()).is_none_or(|c| l.in_category(c)))
            .filter(|l| non_empty(self.location.as_deref()).is_none_or(|loc| l.near(loc)))
            .collect();

        if let Some(limit) = self.limit.filter(|&n| n > 0) {
            filtered.truncate(limit as usize);
        }
        filtered
    }

    /// Query-string pairs for the live search page.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(query) = non_empty(self.query.as_deref()) {
            pairs.push(("q".into(), query.to_string()));
        }
        if let Some(category) = non_empty(self.category.as_deref()) {
            pairs.push(("category".into(), category.to_string()));
        }
        if let Some(location) = non_empty(self.location.as_deref()) {
            pairs.push(("location".into(), location.to_string()));
        }

        pairs
    }
}

// An empty string is treated like an absent field.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
