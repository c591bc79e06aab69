use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use rmcp::ServiceExt;
use rmcp::transport::stdio;

use mcp_secondhand::adapters::cache::memory_cache::MemoryCache;
use mcp_secondhand::adapters::catalog::CatalogService;
use mcp_secondhand::adapters::sources::fixture::FixtureSource;
use mcp_secondhand::adapters::sources::live::LiveSource;
use mcp_secondhand::config::load_config;
use mcp_secondhand::logging;
use mcp_secondhand::mcp::server::SecondhandMcpServer;
use mcp_secondhand::ports::cache::ListingCache;
use mcp_secondhand::ports::listing_source::ListingSource;

fn find_config_path() -> PathBuf {
    // Check common locations for config file
    let candidates = [
        PathBuf::from("config.yaml"),
        binary_dir().join("config.yaml"),
    ];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn binary_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Installed before loading so config warnings are not dropped
    let log_handle = logging::init(|key| std::env::var(key).ok());

    let config_path = find_config_path();
    let config = load_config(&config_path)?;
    logging::apply_config_level(&log_handle, |key| std::env::var(key).ok(), &config.log_level);

    tracing::info!(config = %config_path.display(), "Starting secondhand-malta MCP server");

    let cache: Arc<dyn ListingCache> = Arc::new(MemoryCache::new(config.cache.max_entries));

    let source: Arc<dyn ListingSource> = if config.scraper.live_fetch {
        tracing::info!(base_url = %config.scraper.base_url, "Live fetching enabled");
        Arc::new(LiveSource::new(&config.scraper).context("failed to build HTTP client")?)
    } else {
        tracing::info!("Live fetching disabled, serving built-in sample listings");
        Arc::new(FixtureSource::new(config.scraper.base_url.clone()))
    };

    let catalog = CatalogService::new(source, cache, Duration::from_secs(config.cache.ttl_secs));
    let server = SecondhandMcpServer::new(Arc::new(catalog));

    let service = server.serve(stdio()).await?;
    tracing::info!("Secondhand Malta MCP server running on stdio");
    service.waiting().await?;

    Ok(())
}
