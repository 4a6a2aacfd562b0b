//! HTML parser for catalog listing and product detail pages.

use crate::catalog::extract::{extract_fragment, FragmentSpec, PRODUCT_GROUP, SKU_MAP};
use crate::catalog::models::{
    DetailLink, GroupMetadata, ListingPage, ProductGroup, ProductRecord, SkuMap,
};
use crate::catalog::selectors::{detail, listing};
use crate::error::{ExtractError, ScrapeError};
use scraper::Html;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

/// Result of parsing one detail page.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPage {
    /// One record per SKU variant, in page order.
    Products(Vec<ProductRecord>),
    /// The page carries no structured data (e.g. discontinued items).
    NoData { missing: &'static str },
}

/// Parser for catalog HTML pages.
pub struct Parser {
    origin: String,
}

impl Parser {
    /// Creates a parser that resolves relative links against `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into().trim_end_matches('/').to_string() }
    }

    /// Extracts detail links from a listing page, in document order.
    pub fn parse_listing(&self, html: &str, number: u32) -> ListingPage {
        let document = Html::parse_document(html);

        let links: Vec<DetailLink> = document
            .select(&listing::DETAIL_LINK)
            .filter_map(|e| e.value().attr(listing::HREF_ATTR))
            .map(|href| DetailLink::new(self.absolute(href)))
            .collect();

        debug!("Parsed {} detail links from page {}", links.len(), number);

        ListingPage { number, links }
    }

    /// Parses a detail page into records tagged with `group_id`.
    ///
    /// Missing script blocks yield [`DetailPage::NoData`]; a block that is
    /// present but cannot be parsed is an error naming `url`.
    pub fn parse_detail(
        &self,
        html: &str,
        url: &str,
        group_id: u64,
    ) -> Result<DetailPage, ScrapeError> {
        let document = Html::parse_document(html);

        let Some(sku_text) = document
            .select(&detail::SCRIPT)
            .map(|e| e.text().collect::<String>())
            .find(|text| text.contains(detail::VARIANT_SIGNAL))
        else {
            return Ok(DetailPage::NoData { missing: "variant script" });
        };

        let Some(group_text) =
            document.select(&detail::GROUP_SCRIPT).last().map(|e| e.text().collect::<String>())
        else {
            return Ok(DetailPage::NoData { missing: "product group script" });
        };

        let sku_map = SkuMap::from_value(fragment(&sku_text, &SKU_MAP, url)?)
            .map_err(|e| malformed(url, &SKU_MAP, e))?;
        let metadata: GroupMetadata = typed_fragment(&group_text, &PRODUCT_GROUP, url)?;

        trace!("{}: {} variants, metadata {:?}", url, sku_map.len(), metadata);

        let group = ProductGroup::new(group_id, &metadata);
        let records = sku_map.into_iter().map(|(sku, fields)| group.record(sku, fields)).collect();

        Ok(DetailPage::Products(records))
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.origin, href)
        } else {
            format!("{}/{}", self.origin, href)
        }
    }
}

fn fragment(
    text: &str,
    spec: &FragmentSpec,
    url: &str,
) -> Result<serde_json::Value, ScrapeError> {
    extract_fragment(text, spec).map_err(|source| ScrapeError::Parse { url: url.to_string(), source })
}

fn typed_fragment<T: DeserializeOwned>(
    text: &str,
    spec: &FragmentSpec,
    url: &str,
) -> Result<T, ScrapeError> {
    serde_json::from_value(fragment(text, spec, url)?).map_err(|e| malformed(url, spec, e))
}

fn malformed(url: &str, spec: &FragmentSpec, source: serde_json::Error) -> ScrapeError {
    ScrapeError::Parse {
        url: url.to_string(),
        source: ExtractError::Malformed { marker: spec.start, source },
    }
}
