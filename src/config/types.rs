use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            cache: CacheConfig::default(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause before every outbound request, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Linear backoff unit: retry `n` (1-based) sleeps `n * retry_backoff_ms`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Fetch and parse the real site instead of serving the built-in fixture.
    #[serde(default)]
    pub live_fetch: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit_per_minute: default_rate_limit(),
            request_timeout_secs: default_timeout(),
            base_url: default_base_url(),
            live_fetch: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// `None` keeps the cache unbounded; entries then leave only by expiry.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: None,
        }
    }
}

fn default_user_agent() -> String {
    "secondhand-malta-mcp/1.0.0".into()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_rate_limit() -> u32 {
    30
}

fn default_timeout() -> u64 {
    10
}

fn default_base_url() -> String {
    "http://www.secondhand.com.mt".into()
}

fn default_ttl() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.scraper.user_agent, "secondhand-malta-mcp/1.0.0");
        assert_eq!(config.scraper.request_delay_ms, 1000);
        assert_eq!(config.scraper.max_retries, 3);
        assert_eq!(config.scraper.retry_backoff_ms, 2000);
        assert_eq!(config.scraper.rate_limit_per_minute, 30);
        assert_eq!(config.scraper.request_timeout_secs, 10);
        assert_eq!(config.scraper.base_url, "http://www.secondhand.com.mt");
        assert!(!config.scraper.live_fetch);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl_secs, 300);
        assert!(config.max_entries.is_none());
    }

    #[test]
    fn config_serde_roundtrip() {
        let original = Config::default();
        let yaml = serde_yml::to_string(&original).unwrap();
        let restored: Config = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(restored.scraper.max_retries, original.scraper.max_retries);
        assert_eq!(restored.cache.ttl_secs, original.cache.ttl_secs);
        assert_eq!(restored.log_level, original.log_level);
    }

    #[test]
    fn config_deserialize_with_overrides() {
        let yaml = "scraper:\n  max_retries: 5\ncache:\n  max_entries: 50";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.scraper.max_retries, 5);
        assert_eq!(config.cache.max_entries, Some(50));
        // Other fields get defaults
        assert_eq!(config.scraper.request_timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 300);
    }
}
