//! fragrance-scraper - paginated fragrance catalog scraper
//!
//! Walks the category listing until the site re-serves a page, extracts
//! the variant data embedded in each product page's scripts and writes
//! one spreadsheet row per SKU.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod sink;

pub use catalog::models::{DetailLink, ProductRecord};
pub use config::Config;
pub use error::{ExtractError, ScrapeError, SinkError};
