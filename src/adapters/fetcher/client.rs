use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::adapters::fetcher::rate_limiter::RateLimiter;
use crate::config::types::ScraperConfig;
use crate::error::{MarketplaceError, Result};

/// Polite page fetcher: rate-limited, delayed, and retried with linear
/// backoff.
pub struct HttpFetcher {
    http: Client,
    rate_limiter: RateLimiter,
    request_delay: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            rate_limiter: RateLimiter::per_minute(config.rate_limit_per_minute),
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Fetch `url` and return the response body.
    ///
    /// Every attempt passes the rate limiter and the fixed request delay.
    /// Retryable failures are retried up to `max_retries` times, sleeping
    /// `retry_backoff * n` before retry `n`; the last error is returned once
    /// retries run out. A 404 is returned immediately.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut retries = 0;
        loop {
            self.rate_limiter.wait().await;
            tokio::time::sleep(self.request_delay).await;

            debug!(url, attempt = retries + 1, "Fetching page");

            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        error = %e,
                        "Request failed, retrying... ({retries}/{})",
                        self.max_retries
                    );
                    tokio::time::sleep(self.backoff_before(retries)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff_before(&self, retry: u32) -> Duration {
        self.retry_backoff.saturating_mul(retry)
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(MarketplaceError::Http);
        }
        match status.as_u16() {
            404 => Err(MarketplaceError::NotFound { url: url.into() }),
            429 => {
                warn!(url, "Rate limited by upstream (429)");
                Err(MarketplaceError::RateLimited)
            }
            code => Err(MarketplaceError::Status {
                status: code,
                url: url.into(),
            }),
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config(max_retries: u32) -> ScraperConfig {
        ScraperConfig {
            request_delay_ms: 0,
            retry_backoff_ms: 0,
            rate_limit_per_minute: 0,
            request_timeout_secs: 5,
            max_retries,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetch_sends_identifying_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "secondhand-malta-mcp/1.0.0"))
            .and(header("accept-language", "en-US,en;q=0.5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(3)).unwrap();
        let body = fetcher.fetch(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn three_failures_then_success_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(3)
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(3)).unwrap();
        let body = fetcher.fetch(&server.uri()).await.unwrap();
        assert_eq!(body, "finally");
    }

    #[tokio::test]
    async fn four_failures_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(3)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn rate_limited_response_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(1)).unwrap();
        assert_eq!(fetcher.fetch(&server.uri()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(3)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn zero_retries_fails_on_first_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&fast_config(0)).unwrap();
        assert!(fetcher.fetch(&server.uri()).await.is_err());
    }

    #[tokio::test]
    async fn backoff_grows_linearly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = ScraperConfig {
            retry_backoff_ms: 20,
            ..fast_config(2)
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let start = Instant::now();
        assert!(fetcher.fetch(&server.uri()).await.is_err());
        // 20ms before retry 1, 40ms before retry 2
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn backoff_saturates_for_huge_configured_values() {
        let config = ScraperConfig {
            retry_backoff_ms: u64::MAX,
            ..fast_config(u32::MAX)
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.backoff_before(1), Duration::from_millis(u64::MAX));
        assert_eq!(fetcher.backoff_before(u32::MAX), Duration::MAX);
    }

    #[tokio::test]
    async fn request_delay_applies_before_each_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let config = ScraperConfig {
            request_delay_ms: 30,
            ..fast_config(0)
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let start = Instant::now();
        fetcher.fetch(&server.uri()).await.unwrap();
        fetcher.fetch(&server.uri()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn transport_error_surfaces_after_retries() {
        let fetcher = HttpFetcher::new(&fast_config(1)).unwrap();
        // Port 9 (discard) is expected to refuse connections on test hosts.
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, MarketplaceError::Http(_)));
    }
}
