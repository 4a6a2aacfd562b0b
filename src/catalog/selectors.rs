//! CSS selectors and text signals for catalog HTML parsing.
//!
//! Update this file when the site changes its markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for category listing pages.
pub mod listing {
    use super::*;

    /// Product detail link inside a result tile.
    pub static DETAIL_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".resultItem > section > a").unwrap());

    /// Attribute carrying the detail URL.
    pub static HREF_ATTR: &str = "href";
}

/// Selectors for product detail pages.
pub mod detail {
    use super::*;

    /// Every inline script block.
    pub static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

    /// Script blocks that carry product-group analytics data.
    pub static GROUP_SCRIPT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(r#"script[type="optimize-js"]"#).unwrap());

    /// Text present only in the script holding the SKU map.
    pub static VARIANT_SIGNAL: &str = "var variant_id";
}
