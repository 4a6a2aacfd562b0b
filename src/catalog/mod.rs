//! Catalog-specific modules for HTTP client, parsing, extraction and data models.

pub mod client;
pub mod extract;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{CatalogClient, CatalogSource, CATALOG_ROOT};
pub use models::{DetailLink, GroupMetadata, ListingPage, ProductRecord, SkuMap};
pub use parser::{DetailPage, Parser};
