use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Serialize;

use crate::domain::search_params::SearchParams;
use crate::error::MarketplaceError;
use crate::ports::marketplace_client::MarketplaceClient;

// ---------- Tool parameter types ----------

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchToolParams {
    /// Search keywords, matched against listing titles and descriptions
    pub query: Option<String>,
    /// Filter by category (exact name, e.g. "Furniture"; see get_categories)
    pub category: Option<String>,
    /// Filter by location in Malta (e.g. "Sliema"; see get_locations)
    pub location: Option<String>,
    /// Minimum price. Accepted but not applied as a filter.
    pub min_price: Option<f64>,
    /// Maximum price. Accepted but not applied as a filter.
    pub max_price: Option<f64>,
    /// Maximum number of results to return. Fractions are truncated; omit,
    /// or pass 0 or a negative number, for all matches.
    pub limit: Option<f64>,
}

impl From<SearchToolParams> for SearchParams {
    fn from(p: SearchToolParams) -> Self {
        Self {
            query: p.query,
            category: p.category,
            location: p.location,
            min_price: p.min_price,
            max_price: p.max_price,
            limit: p.limit.and_then(whole_limit),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_limit(limit: f64) -> Option<u32> {
    (limit.is_finite() && limit >= 1.0).then(|| limit.min(f64::from(u32::MAX)) as u32)
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailToolParams {
    /// The ID of the listing, as returned by search_listings
    pub listing_id: String,
}

// ---------- MCP Server ----------

#[derive(Clone)]
pub struct SecondhandMcpServer {
    client: Arc<dyn MarketplaceClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SecondhandMcpServer {
    pub fn new(client: Arc<dyn MarketplaceClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Search marketplace listings by keyword, category and location.
    #[tool(
        name = "search_listings",
        description = "Search for listings on secondhand.com.mt. Filters are optional and combine: query (title or description, case-insensitive), category (exact, case-insensitive), location (partial, case-insensitive), limit. minPrice/maxPrice are accepted but not currently applied. Returns a JSON array of listings.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn search_listings(
        &self,
        Parameters(params): Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = SearchParams::from(params);
        Ok(match self.client.search_listings(&params).await {
            Ok(listings) => json_result("search_listings", &listings),
            Err(e) => tool_error("search_listings", &e),
        })
    }

    /// Get one listing by ID.
    #[tool(
        name = "get_listing_details",
        description = "Get detailed information about a specific listing, including description, images and contact information. Requires a listing ID from search_listings.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn get_listing_details(
        &self,
        Parameters(params): Parameters<DetailToolParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(
            match self.client.get_listing_details(&params.listing_id).await {
                Ok(Some(listing)) => json_result("get_listing_details", &listing),
                Ok(None) => {
                    CallToolResult::error(vec![Content::text("Listing not found")])
                }
                Err(e) => tool_error("get_listing_details", &e),
            },
        )
    }

    #[tool(
        name = "get_categories",
        description = "Retrieve all available listing categories.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn get_categories(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.client.get_categories().await {
            Ok(categories) => json_result("get_categories", &categories),
            Err(e) => tool_error("get_categories", &e),
        })
    }

    #[tool(
        name = "get_locations",
        description = "Get the list of Malta locations available for filtering.",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn get_locations(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.client.get_locations().await {
            Ok(locations) => json_result("get_locations", &locations),
            Err(e) => tool_error("get_locations", &e),
        })
    }
}

fn json_result<T: Serialize>(tool: &str, value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => tool_error(tool, &MarketplaceError::Json(e)),
    }
}

fn tool_error(tool: &str, e: &MarketplaceError) -> CallToolResult {
    tracing::warn!(tool, error = %e, "Tool invocation failed");
    CallToolResult::error(vec![Content::text(format!("Error executing {tool}: {e}"))])
}

#[tool_handler]
impl ServerHandler for SecondhandMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "MCP server for secondhand.com.mt, Malta's classified-ads marketplace.\n\
                 \n\
                 - search_listings: find listings by keyword, category and location\n\
                 - get_listing_details: full record for one listing ID\n\
                 - get_categories: category names accepted by search_listings\n\
                 - get_locations: Malta locations accepted by search_listings\n\
                 \n\
                 Results are cached for a few minutes, so repeated queries are cheap."
                    .into(),
            ),
        }
    }
}
