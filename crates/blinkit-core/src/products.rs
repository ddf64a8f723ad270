use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A two-level taxonomy leaf read from the categories input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryPair {
    pub l1_category: String,
    pub l1_category_id: String,
    pub l2_category: String,
    pub l2_category_id: String,
}

impl std::fmt::Display for CategoryPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} > {}", self.l1_category, self.l2_category)
    }
}

/// A delivery location. Coordinates are kept exactly as they appear in the
/// input file; they are sent verbatim as request headers and written
/// verbatim to the output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One output row: a product variant as listed at one location for one
/// category on one day.
///
/// Field order is the CSV column order; the header row is derived from the
/// field names, so do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Calendar date of the listing, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub l1_category: String,
    pub l1_category_id: String,
    pub l2_category: String,
    pub l2_category_id: String,
    /// Listing `merchant_id`; empty when the listing omits it.
    pub store_id: String,
    /// Listing `product_id`; empty when the listing omits it.
    pub variant_id: String,
    pub variant_name: String,
    pub group_id: String,
    /// Price the product sells at, currency symbol stripped.
    pub selling_price: f64,
    /// Maximum retail price, currency symbol stripped.
    pub mrp: f64,
    pub in_stock: bool,
    pub inventory: i64,
    pub is_sponsored: bool,
    pub image_url: String,
    /// `"NA"` when the listing carries no brand id.
    pub brand_id: String,
    pub brand: String,
    pub latitude: String,
    pub longitude: String,
}

impl ProductRecord {
    /// Column names in output order.
    pub const CSV_HEADER: [&'static str; 19] = [
        "date",
        "l1_category",
        "l1_category_id",
        "l2_category",
        "l2_category_id",
        "store_id",
        "variant_id",
        "variant_name",
        "group_id",
        "selling_price",
        "mrp",
        "in_stock",
        "inventory",
        "is_sponsored",
        "image_url",
        "brand_id",
        "brand",
        "latitude",
        "longitude",
    ];
}
