//! Integration tests for the HTML parser using fixture files.

use fragrance_scraper::catalog::{DetailPage, Parser};
use fragrance_scraper::sink::{row, Cell};
use serde_json::json;

const LISTING_FIXTURE: &str = include_str!("fixtures/listing_page.html");
const PRODUCT_FIXTURE: &str = include_str!("fixtures/product_page.html");

const ORIGIN: &str = "https://www.fragrancenet.com";
const PRODUCT_URL: &str =
    "https://www.fragrancenet.com/perfume/chanel/chanel-no-5/eau-de-parfum#118177";

#[test]
fn test_parse_listing_fixture() {
    let page = Parser::new(ORIGIN).parse_listing(LISTING_FIXTURE, 1);

    // The promo tile is not a result item
    assert_eq!(page.links.len(), 3);
    assert_eq!(page.first_link().unwrap().as_str(), PRODUCT_URL);
    assert_eq!(
        page.links[1].as_str(),
        "https://www.fragrancenet.com/cologne/dior/dior-sauvage/edt#283715"
    );
}

#[test]
fn test_parse_product_fixture() {
    let parsed = Parser::new(ORIGIN).parse_detail(PRODUCT_FIXTURE, PRODUCT_URL, 42).unwrap();
    let DetailPage::Products(records) = parsed else {
        panic!("expected products");
    };

    let skus: Vec<_> = records.iter().map(|r| r.sku.as_str()).collect();
    assert_eq!(skus, vec!["118177", "118178", "118180"]);
    assert!(records.iter().all(|r| r.id == 42));
    assert!(records.iter().all(|r| r.brand_designer.as_deref() == Some("Chanel No 5 by Chanel")));

    let first = &records[0];
    assert_eq!(first.name, Some(json!("1.2 oz Eau De Parfum Spray")));
    assert_eq!(first.list_price, Some(json!(98.99)));
    assert_eq!(first.retail_price, Some(json!(135)));
    assert_eq!(first.sale_price, Some(json!(89.09)));
    assert_eq!(first.stock_warn, Some(json!("enough quantity")));

    // null sale price is a missing value, not zero
    assert_eq!(records[1].sale_price, None);
    assert_eq!(records[1].stock_warn, Some(json!(1)));

    // string prices pass through untouched
    assert_eq!(records[2].list_price, Some(json!("Call")));
}

#[test]
fn test_product_fixture_row_cells() {
    let parsed = Parser::new(ORIGIN).parse_detail(PRODUCT_FIXTURE, PRODUCT_URL, 0).unwrap();
    let DetailPage::Products(records) = parsed else {
        panic!("expected products");
    };

    let cells = row(&records[1]);
    assert_eq!(cells[0], Cell::Number(0.0));
    assert_eq!(cells[2], Cell::Text("3.4 oz Eau De Parfum Spray".to_string()));
    assert_eq!(cells[6], Cell::Number(168.5));
    assert_eq!(cells[8], Cell::Empty);
    assert_eq!(cells[10], Cell::Text("W".to_string()));
}

#[test]
fn test_listing_fixture_is_not_a_product_page() {
    let parsed = Parser::new(ORIGIN).parse_detail(LISTING_FIXTURE, "https://x/listing", 0).unwrap();
    assert!(matches!(parsed, DetailPage::NoData { .. }));
}
