pub mod types;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MarketplaceError, Result};
use types::Config;

/// Load `config.yaml` if present, then layer environment overrides on top.
///
/// Overrides come from the process environment, falling back to a `.env`
/// file in the working directory.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = load_config_file(path)?;
    let dotenv = read_dotenv(Path::new(".env"));
    apply_env_overrides(&mut config, env_then_dotenv(&dotenv));
    Ok(config)
}

/// Variables from a dotenv file. A missing file yields an empty map and a
/// malformed line is skipped with a warning.
pub fn read_dotenv(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read dotenv file");
            return HashMap::new();
        }
    };
    iter.filter_map(|item| {
        item.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Skipping malformed dotenv line");
        })
        .ok()
    })
    .collect()
}

/// The process environment wins over the dotenv file.
fn env_then_dotenv(dotenv: &HashMap<String, String>) -> impl Fn(&str) -> Option<String> + '_ {
    move |key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        MarketplaceError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yml::from_str(&content)?;
    Ok(config)
}

/// Apply the environment variables the server recognises.
///
/// `lookup` is `std::env::var` in production; tests pass a map instead of
/// touching the process environment.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(ua) = lookup("USER_AGENT").filter(|v| !v.trim().is_empty()) {
        config.scraper.user_agent = ua;
    }
    override_parsed(&lookup, "REQUEST_DELAY_MS", &mut config.scraper.request_delay_ms);
    override_parsed(&lookup, "MAX_RETRIES", &mut config.scraper.max_retries);
    override_parsed(
        &lookup,
        "RATE_LIMIT_REQUESTS_PER_MINUTE",
        &mut config.scraper.rate_limit_per_minute,
    );
    override_parsed(&lookup, "CACHE_TTL_SECONDS", &mut config.cache.ttl_secs);
    override_parsed(&lookup, "LIVE_FETCH", &mut config.scraper.live_fetch);
    if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
        config.log_level = level;
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparseable environment override"),
    }
}
