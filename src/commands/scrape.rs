//! Scrape command: walks the catalog page by page and exports every variant.

use crate::catalog::{
    CatalogClient, CatalogSource, DetailLink, DetailPage, ListingPage, Parser, ProductRecord,
};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::sink::{self, ResultsSink};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::fmt;
use tracing::{debug, info, warn};

/// True when the site re-served the previous page.
///
/// Out-of-range page numbers return the last real page again instead of an
/// empty page, so an identical first link marks the end of the catalog.
/// Empty link lists never terminate the walk.
pub fn end_of_catalog(current: &[DetailLink], previous: &[DetailLink]) -> bool {
    match (current.first(), previous.first()) {
        (Some(current), Some(previous)) => current == previous,
        _ => false,
    }
}

/// Fetches one detail page and parses it into records tagged with `group_id`.
pub async fn fetch_details(
    client: &impl CatalogSource,
    parser: &Parser,
    group_id: u64,
    link: &DetailLink,
) -> Result<DetailPage, ScrapeError> {
    let html = client.detail(link.as_str()).await?;
    parser.parse_detail(&html, link.as_str(), group_id)
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkEnd {
    /// A page repeated the previous page's first link.
    #[default]
    EndOfCatalog,
    /// `max_pages` listing pages were visited, or the page number ran out.
    PageLimit,
}

/// Counters reported after a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub pages_written: u32,
    pub pages_failed: u32,
    pub records_written: usize,
    pub products_without_data: usize,
    pub products_failed: usize,
    /// Last page number requested
    pub last_page: u32,
    pub end: WalkEnd,
}

impl fmt::Display for WalkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            WalkEnd::EndOfCatalog => {
                writeln!(f, "All {} pages of product data scraped.", self.pages_written)?
            }
            WalkEnd::PageLimit => {
                writeln!(f, "Stopped at page limit after {} pages.", self.pages_written)?
            }
        }
        write!(
            f,
            "Records: {}  Products without data: {}  Failed products: {}  Failed pages: {}",
            self.records_written,
            self.products_without_data,
            self.products_failed,
            self.pages_failed
        )
    }
}

/// Executes a full catalog walk.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes the live catalog into the configured output file.
    ///
    /// The output is finalized even when the walk aborts, so rows written
    /// before a failure are kept.
    pub async fn execute(&self) -> Result<WalkSummary> {
        self.config.validate()?;

        let client =
            CatalogClient::new(&self.config).await.context("Failed to create HTTP client")?;
        let mut sink = sink::open(self.config.format, &self.config.output).with_context(|| {
            format!("Failed to open output file: {}", self.config.output.display())
        })?;

        let walked = self.execute_with_client(&client, sink.as_mut()).await;
        let finished = sink.finish();

        let summary = walked.context("Scrape aborted")?;
        finished.with_context(|| {
            format!("Failed to save output file: {}", self.config.output.display())
        })?;

        info!("Saved {} rows to {}", summary.records_written, self.config.output.display());
        Ok(summary)
    }

    /// Walks the catalog with a provided client and sink (for testing).
    ///
    /// Only a sink failure aborts the walk.
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogSource,
        sink: &mut dyn ResultsSink,
    ) -> Result<WalkSummary, ScrapeError> {
        let parser = Parser::new(client.origin());

        let mut summary = WalkSummary::default();
        let mut page = self.config.start_page;
        let mut previous: Vec<DetailLink> = Vec::new();
        // Running link count; group ids are `total + index on page`.
        let mut total: u64 = 0;
        let mut visited: u32 = 0;

        loop {
            if self.config.max_pages.is_some_and(|max| visited >= max) {
                info!("Reached page limit of {}", visited);
                summary.end = WalkEnd::PageLimit;
                break;
            }
            visited += 1;
            summary.last_page = page;
            info!("Page: {}", page);

            let listing = match self.fetch_listing(client, &parser, page).await {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("Skipping page {}: {}", page, e.report());
                    summary.pages_failed += 1;
                    match page.checked_add(1) {
                        Some(next) => page = next,
                        None => {
                            summary.end = WalkEnd::PageLimit;
                            break;
                        }
                    }
                    continue;
                }
            };

            if end_of_catalog(&listing.links, &previous) {
                info!("Page {} repeats the previous page; end of catalog", page);
                summary.end = WalkEnd::EndOfCatalog;
                break;
            }

            let batch = self.fetch_page_details(client, &parser, &listing, total, &mut summary).await;

            sink.write_batch(&batch)?;
            summary.pages_written += 1;
            summary.records_written += batch.len();
            debug!("Page {}: wrote {} records", page, batch.len());

            total += listing.links.len() as u64;
            previous = listing.links;
            let Some(next) = page.checked_add(1) else {
                info!("No page number after {}", page);
                summary.end = WalkEnd::PageLimit;
                break;
            };
            page = next;
        }

        info!(
            "Walk finished at page {}: {} records from {} pages",
            summary.last_page, summary.records_written, summary.pages_written
        );

        Ok(summary)
    }

    /// Fetches and parses one listing page, retrying up to `page_retries` times.
    async fn fetch_listing(
        &self,
        client: &impl CatalogSource,
        parser: &Parser,
        page: u32,
    ) -> Result<ListingPage, ScrapeError> {
        let mut attempt = 0;
        loop {
            match client.listing(page).await {
                Ok(html) => return Ok(parser.parse_listing(&html, page)),
                Err(e) if attempt < self.config.page_retries => {
                    attempt += 1;
                    debug!("Retrying page {} ({}/{}): {}", page, attempt, self.config.page_retries, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Collects the records of every detail page linked from `listing`, in link order.
    async fn fetch_page_details(
        &self,
        client: &impl CatalogSource,
        parser: &Parser,
        listing: &ListingPage,
        first_id: u64,
        summary: &mut WalkSummary,
    ) -> Vec<ProductRecord> {
        let outcomes: Vec<_> = stream::iter(listing.links.iter().enumerate())
            .map(|(i, link)| fetch_details(client, parser, first_id + i as u64, link))
            .buffered(self.config.detail_concurrency.max(1))
            .collect()
            .await;

        let mut batch = Vec::new();
        for (link, outcome) in listing.links.iter().zip(outcomes) {
            match outcome {
                Ok(DetailPage::Products(records)) => batch.extend(records),
                Ok(DetailPage::NoData { missing }) => {
                    debug!("No product data on {} ({} missing)", link, missing);
                    summary.products_without_data += 1;
                }
                Err(e) => {
                    warn!("Failed to scrape {}: {}", link, e.report());
                    summary.products_failed += 1;
                }
            }
        }
        batch
    }
}
