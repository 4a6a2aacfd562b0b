//! HTTP client for catalog requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::ScrapeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Fragrance category root; listing pages are `?page=N` on this URL.
pub const CATALOG_ROOT: &str = "https://www.fragrancenet.com/fragrances";

/// Trait for listing/detail fetching - enables mocking for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches one listing page and returns the HTML response.
    async fn listing(&self, page: u32) -> Result<String, ScrapeError>;

    /// Fetches a product detail page by URL.
    async fn detail(&self, url: &str) -> Result<String, ScrapeError>;

    /// Scheme and host used to resolve relative detail links.
    fn origin(&self) -> String;
}

/// Catalog HTTP client with browser impersonation.
pub struct CatalogClient {
    client: Client,
    root: String,
}

impl CatalogClient {
    /// Creates a client for the fragrance catalog.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_root(config, None).await
    }

    /// Creates a client with an optional custom catalog root (for testing).
    pub async fn with_root(config: &Config, root: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, root: root.unwrap_or_else(|| CATALOG_ROOT.to_string()) })
    }

    fn listing_url(&self, page: u32) -> String {
        format!("{}?page={}", self.root, page)
    }

    /// Performs a GET request with browser headers.
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|source| ScrapeError::Network { url: url.to_string(), source })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(ScrapeError::Status { url: url.to_string(), status: status.as_u16() });
        }

        response.text().await.map_err(|source| ScrapeError::Network { url: url.to_string(), source })
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn listing(&self, page: u32) -> Result<String, ScrapeError> {
        info!("Fetching listing page {}", page);
        self.get(&self.listing_url(page)).await
    }

    async fn detail(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching product: {}", url);
        self.get(url).await
    }

    fn origin(&self) -> String {
        origin_of(&self.root).to_string()
    }
}

/// `scheme://host[:port]` prefix of `url`.
fn origin_of(url: &str) -> &str {
    let host_start = url.find("://").map_or(0, |i| i + 3);
    match url[host_start..].find('/') {
        Some(i) => &url[..host_start + i],
        None => url,
    }
}
