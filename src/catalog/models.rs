//! Data models for listing pages, variant data and exported product rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Label written in place of a zero stock warning.
pub const ENOUGH_QUANTITY: &str = "enough quantity";

/// URL of one product detail page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailLink(String);

impl DetailLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DetailLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of the category listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Page number as requested
    pub number: u32,
    /// Detail links in document order
    pub links: Vec<DetailLink>,
}

impl ListingPage {
    /// First link on the page, used to recognise a re-served page.
    pub fn first_link(&self) -> Option<&DetailLink> {
        self.links.first()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Fields of one purchasable variant, as embedded in the SKU map.
///
/// Every field is kept as a raw JSON value so numbers and strings pass
/// through untouched, whatever type the page happens to use.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VariantFields {
    /// Size label, e.g. "3.4 oz EDP Spray"
    #[serde(rename = "SIZE_default", default)]
    pub name: Option<Value>,
    /// 300px image URL
    #[serde(default)]
    pub img: Option<Value>,
    /// 900px image URL
    #[serde(default)]
    pub zoom_img: Option<Value>,
    #[serde(rename = "price_int", default)]
    pub list_price: Option<Value>,
    #[serde(rename = "retail_price_int", default)]
    pub retail_price: Option<Value>,
    #[serde(rename = "discount_price_int", default)]
    pub sale_price: Option<Value>,
    #[serde(default)]
    pub stock_warn: Option<Value>,
}

/// SKU → variant fields, in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkuMap(Vec<(String, VariantFields)>);

impl SkuMap {
    /// Builds the map from an extracted JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let object: serde_json::Map<String, Value> = serde_json::from_value(value)?;
        object
            .into_iter()
            .map(|(sku, fields)| Ok((sku, serde_json::from_value(fields)?)))
            .collect::<Result<Vec<_>, serde_json::Error>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for SkuMap {
    type Item = (String, VariantFields);
    type IntoIter = std::vec::IntoIter<(String, VariantFields)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Attributes shared by every variant of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupMetadata {
    #[serde(default)]
    pub brand: Option<Value>,
    #[serde(default)]
    pub designer: Option<Value>,
    #[serde(default)]
    pub gender: Option<Value>,
}

impl GroupMetadata {
    /// "brand by designer", or whichever of the two is present.
    pub fn brand_designer(&self) -> Option<String> {
        match (scalar_text(&self.brand), scalar_text(&self.designer)) {
            (Some(brand), Some(designer)) => Some(format!("{} by {}", brand, designer)),
            (brand, None) => brand,
            (None, designer) => designer,
        }
    }
}

/// Text of a scalar: strings as-is, other values in JSON form. Null is absent.
fn scalar_text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Values computed once per detail page and stamped on each of its records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup {
    pub id: u64,
    pub brand_designer: Option<String>,
    pub gender: Option<Value>,
}

impl ProductGroup {
    pub fn new(id: u64, metadata: &GroupMetadata) -> Self {
        Self { id, brand_designer: metadata.brand_designer(), gender: metadata.gender.clone() }
    }

    /// Flattens one SKU map entry into an exportable record.
    pub fn record(&self, sku: String, fields: VariantFields) -> ProductRecord {
        ProductRecord {
            id: self.id,
            sku,
            name: fields.name,
            brand_designer: self.brand_designer.clone(),
            img: fields.img,
            zoom_img: fields.zoom_img,
            list_price: fields.list_price,
            retail_price: fields.retail_price,
            sale_price: fields.sale_price,
            stock_warn: fields.stock_warn.map(stock_label),
            gender: self.gender.clone(),
        }
    }
}

/// Replaces a numeric zero stock warning with a readable label.
fn stock_label(value: Value) -> Value {
    match value.as_f64() {
        Some(n) if n == 0.0 => Value::String(ENOUGH_QUANTITY.to_string()),
        _ => value,
    }
}

/// One spreadsheet row: a variant merged with its product group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Group id shared by all variants from the same detail page
    pub id: u64,
    pub sku: String,
    pub name: Option<Value>,
    pub brand_designer: Option<String>,
    pub img: Option<Value>,
    pub zoom_img: Option<Value>,
    pub list_price: Option<Value>,
    pub retail_price: Option<Value>,
    pub sale_price: Option<Value>,
    pub stock_warn: Option<Value>,
    pub gender: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(brand: Option<&str>, designer: Option<&str>) -> GroupMetadata {
        GroupMetadata {
            brand: brand.map(|b| json!(b)),
            designer: designer.map(|d| json!(d)),
            gender: Some(json!("W")),
        }
    }

    #[test]
    fn test_brand_only() {
        assert_eq!(metadata(Some("Chanel"), None).brand_designer().as_deref(), Some("Chanel"));
    }

    #[test]
    fn test_brand_and_designer() {
        assert_eq!(
            metadata(Some("Chanel"), Some("Karl")).brand_designer().as_deref(),
            Some("Chanel by Karl")
        );
    }

    #[test]
    fn test_designer_only() {
        assert_eq!(metadata(None, Some("Karl")).brand_designer().as_deref(), Some("Karl"));
    }

    #[test]
    fn test_neither_brand_nor_designer() {
        assert_eq!(metadata(None, None).brand_designer(), None);
    }

    #[test]
    fn test_zero_stock_warn_is_labelled() {
        let sku_map =
            SkuMap::from_value(json!({"SKU1": {"SIZE_default": "50ml", "price_int": 80, "stock_warn": 0}}))
                .unwrap();
        let group = ProductGroup::new(7, &metadata(Some("Chanel"), None));

        let records: Vec<_> =
            sku_map.into_iter().map(|(sku, fields)| group.record(sku, fields)).collect();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, 7);
        assert_eq!(record.sku, "SKU1");
        assert_eq!(record.name, Some(json!("50ml")));
        assert_eq!(record.list_price, Some(json!(80)));
        assert_eq!(record.stock_warn, Some(json!("enough quantity")));
        assert_eq!(record.brand_designer.as_deref(), Some("Chanel"));
        assert_eq!(record.gender, Some(json!("W")));
    }

    #[test]
    fn test_non_string_text_fields_pass_through() {
        let sku_map = SkuMap::from_value(json!({
            "S1": {"SIZE_default": 50, "img": false, "price_int": 80, "stock_warn": 0}
        }))
        .unwrap();
        let metadata: GroupMetadata =
            serde_json::from_value(json!({"brand": 212, "designer": "Carolina Herrera", "gender": 1}))
                .unwrap();
        let group = ProductGroup::new(3, &metadata);

        let (sku, fields) = sku_map.into_iter().next().unwrap();
        let record = group.record(sku, fields);

        assert_eq!(record.name, Some(json!(50)));
        assert_eq!(record.img, Some(json!(false)));
        assert_eq!(record.gender, Some(json!(1)));
        assert_eq!(record.brand_designer.as_deref(), Some("212 by Carolina Herrera"));
    }

    #[test]
    fn test_null_brand_counts_as_absent() {
        let metadata: GroupMetadata =
            serde_json::from_value(json!({"brand": null, "designer": "Karl"})).unwrap();
        assert_eq!(metadata.brand_designer().as_deref(), Some("Karl"));
    }

    #[test]
    fn test_other_stock_warn_passes_through() {
        assert_eq!(stock_label(json!(2)), json!(2));
        assert_eq!(stock_label(json!("low")), json!("low"));
        assert_eq!(stock_label(json!(0.0)), json!("enough quantity"));
    }

    #[test]
    fn test_absent_prices_stay_absent() {
        let sku_map = SkuMap::from_value(json!({"S": {"SIZE_default": "1 oz"}})).unwrap();
        let group = ProductGroup::new(0, &GroupMetadata::default());
        let (sku, fields) = sku_map.into_iter().next().unwrap();
        let record = group.record(sku, fields);

        assert_eq!(record.list_price, None);
        assert_eq!(record.retail_price, None);
        assert_eq!(record.sale_price, None);
        assert_eq!(record.stock_warn, None);
    }

    #[test]
    fn test_sku_map_keeps_page_order() {
        let sku_map = SkuMap::from_value(json!({"Z1": {}, "A2": {}, "M3": {}})).unwrap();
        let skus: Vec<_> = sku_map.into_iter().map(|(sku, _)| sku).collect();
        assert_eq!(skus, vec!["Z1", "A2", "M3"]);
    }

    #[test]
    fn test_sku_map_rejects_non_object() {
        assert!(SkuMap::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_listing_first_link() {
        let page = ListingPage {
            number: 1,
            links: vec![DetailLink::new("https://x/a"), DetailLink::new("https://x/b")],
        };
        assert_eq!(page.first_link().map(DetailLink::as_str), Some("https://x/a"));
        assert!(!page.is_empty());
    }
}
