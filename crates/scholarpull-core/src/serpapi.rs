//! HTTP client for the SerpApi Google Scholar author engine.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::CoreError;
use crate::source::{AuthorQuery, AuthorSource};

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const ENGINE: &str = "google_scholar_author";
const USER_AGENT: &str = concat!("scholarpull/", env!("CARGO_PKG_VERSION"));

/// Fetches author payloads from SerpApi.
#[derive(Clone)]
pub struct SerpApiClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing connection pool.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `query`, API key included.
    pub fn request_url(&self, query: &AuthorQuery) -> String {
        let mut url = format!(
            "{}?engine={}&author_id={}&api_key={}",
            self.base_url,
            ENGINE,
            urlencoding::encode(&query.author_id),
            urlencoding::encode(&self.api_key)
        );
        if let Some(start) = query.start {
            url.push_str(&format!("&start={}", start));
        }
        if let Some(num) = query.num {
            url.push_str(&format!("&num={}", num));
        }
        if let Some(ref hl) = query.hl {
            url.push_str(&format!("&hl={}", urlencoding::encode(hl)));
        }
        if let Some(ref sort) = query.sort {
            url.push_str(&format!("&sort={}", urlencoding::encode(sort)));
        }
        if query.no_cache {
            url.push_str("&no_cache=true");
        }
        url
    }
}

impl AuthorSource for SerpApiClient {
    fn name(&self) -> &str {
        "SerpApi"
    }

    fn fetch_author_json<'a>(
        &'a self,
        query: &'a AuthorQuery,
    ) -> Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.request_url(query);
            tracing::debug!(author_id = %query.author_id, "fetching author payload");

            // reqwest errors carry the request URL, which holds the API key.
            let resp = self
                .client
                .get(&url)
                .header("User-Agent", USER_AGENT)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| CoreError::Http(e.without_url()))?;

            check_rate_limit_response(&resp)?;

            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| CoreError::Http(e.without_url()))?;

            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), "author request failed");
                return Err(CoreError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            tracing::debug!(bytes = body.len(), "author payload received");
            Ok(body)
        })
    }
}

/// Return `Err(CoreError::RateLimited)` for a 429, reading `Retry-After` when present.
pub fn check_rate_limit_response(resp: &reqwest::Response) -> Result<(), CoreError> {
    if resp.status().as_u16() == 429 {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        Err(CoreError::RateLimited { retry_after })
    } else {
        Ok(())
    }
}

/// Parse a Retry-After header value (seconds or HTTP-date).
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    // HTTP-date: not worth a date parser, wait a conservative fixed time.
    if value.contains(',') || value.contains("GMT") {
        return Some(Duration::from_secs(5));
    }
    None
}
