//! CLI command implementations.

pub mod scrape;
pub mod shell;

pub use scrape::{ScrapeCommand, WalkEnd, WalkSummary};
