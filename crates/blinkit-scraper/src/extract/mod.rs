//! Product extraction from listing snippets.
//!
//! A listing response is a list of UI widgets ("snippets"). Only two widget
//! layouts carry products, and they nest the product differently:
//!
//! - `product_card_snippet_type_2`: the snippet's `data` object *is* the product.
//! - `product_container`: `data` holds a list of items (usually `data.items`,
//!   otherwise the first non-empty list of objects among `data`'s values);
//!   the first item's `product` object is the product, or the item itself
//!   when it has no `product`.
//!
//! Each layout is a [`WidgetShape`] variant with its own resolution rule, so
//! supporting another layout means adding a variant and its match arm.

pub mod fields;

use blinkit_core::{CategoryPair, Location, ProductRecord};
use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::ScraperError;
use fields::{integer_value, is_in_stock, is_sponsored, parse_price, scalar_text, text_value};

type JsonObject = Map<String, Value>;

/// Widget layouts known to carry a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetShape {
    CardV2,
    Container,
}

impl WidgetShape {
    /// Recognized shapes, in matching order.
    pub const ALL: [WidgetShape; 2] = [WidgetShape::CardV2, WidgetShape::Container];

    /// The `widget_type` discriminator the API uses for this shape.
    #[must_use]
    pub fn widget_type(self) -> &'static str {
        match self {
            WidgetShape::CardV2 => "product_card_snippet_type_2",
            WidgetShape::Container => "product_container",
        }
    }

    #[must_use]
    pub fn from_widget_type(widget_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.widget_type() == widget_type)
    }

    /// Locates the product object inside a snippet's non-empty `data`.
    fn resolve_product(self, data: &JsonObject) -> Option<&JsonObject> {
        match self {
            WidgetShape::CardV2 => Some(data),
            WidgetShape::Container => {
                let item = container_items(data)?.first()?.as_object()?;
                match item.get("product") {
                    Some(Value::Object(product)) if !product.is_empty() => Some(product),
                    _ => Some(item),
                }
            }
        }
    }
}

/// `data.items` when it is a non-empty list, else the first value of `data`
/// that is a list starting with an object.
fn container_items(data: &JsonObject) -> Option<&Vec<Value>> {
    if let Some(items) = data
        .get("items")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
    {
        return Some(items);
    }
    data.values()
        .filter_map(Value::as_array)
        .find(|list| list.first().is_some_and(Value::is_object))
}

/// Product fields read from one snippet, before category, location, and
/// date are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingProduct {
    pub shape: WidgetShape,
    pub store_id: String,
    pub variant_id: String,
    pub variant_name: String,
    pub group_id: String,
    pub selling_price: f64,
    pub mrp: f64,
    pub in_stock: bool,
    pub inventory: i64,
    pub is_sponsored: bool,
    pub image_url: String,
    pub brand_id: String,
    pub brand: String,
}

impl ListingProduct {
    fn from_product(shape: WidgetShape, product: &JsonObject) -> Result<Self, ScraperError> {
        let variant_id = scalar_text(product.get("product_id"));
        let selling_price = parse_price(product.get("normal_price"), "normal_price", &variant_id)?;
        let mrp = parse_price(product.get("mrp"), "mrp", &variant_id)?;

        // Only an absent key gets the sentinel; an explicit null stays empty.
        let brand_id = product
            .get("brand_id")
            .map_or_else(|| "NA".to_owned(), |value| scalar_text(Some(value)));

        Ok(Self {
            shape,
            store_id: scalar_text(product.get("merchant_id")),
            variant_name: text_value(product.get("name")),
            group_id: scalar_text(product.get("group_id")),
            selling_price,
            mrp,
            in_stock: is_in_stock(product),
            inventory: integer_value(product.get("inventory")),
            is_sponsored: is_sponsored(product),
            image_url: scalar_text(product.get("image")),
            brand_id,
            brand: text_value(product.get("brand_name")),
            variant_id,
        })
    }

    /// Attaches the request context to produce an output row.
    #[must_use]
    pub fn into_record(
        self,
        category: &CategoryPair,
        location: &Location,
        date: NaiveDate,
    ) -> ProductRecord {
        ProductRecord {
            date,
            l1_category: category.l1_category.clone(),
            l1_category_id: category.l1_category_id.clone(),
            l2_category: category.l2_category.clone(),
            l2_category_id: category.l2_category_id.clone(),
            store_id: self.store_id,
            variant_id: self.variant_id,
            variant_name: self.variant_name,
            group_id: self.group_id,
            selling_price: self.selling_price,
            mrp: self.mrp,
            in_stock: self.in_stock,
            inventory: self.inventory,
            is_sponsored: self.is_sponsored,
            image_url: self.image_url,
            brand_id: self.brand_id,
            brand: self.brand,
            latitude: location.latitude.clone(),
            longitude: location.longitude.clone(),
        }
    }
}

/// Reads the product carried by one snippet.
///
/// Returns `Ok(None)` when the snippet is not a product: not an object, an
/// unrecognized `widget_type`, empty or missing `data`, or a container with
/// no items.
///
/// # Errors
///
/// Returns [`ScraperError::MissingPrice`] or [`ScraperError::InvalidPrice`]
/// when a product is found but its `normal_price` or `mrp` cannot be read.
pub fn extract_listing_product(snippet: &Value) -> Result<Option<ListingProduct>, ScraperError> {
    let Some(snippet) = snippet.as_object() else {
        return Ok(None);
    };
    let Some(shape) = snippet
        .get("widget_type")
        .and_then(Value::as_str)
        .and_then(WidgetShape::from_widget_type)
    else {
        return Ok(None);
    };
    let Some(data) = snippet
        .get("data")
        .and_then(Value::as_object)
        .filter(|data| !data.is_empty())
    else {
        return Ok(None);
    };
    let Some(product) = shape.resolve_product(data) else {
        tracing::debug!(
            widget_type = shape.widget_type(),
            "product container has no items; skipping snippet"
        );
        return Ok(None);
    };

    ListingProduct::from_product(shape, product).map(Some)
}

/// Reads one snippet straight into an output row for `category` at
/// `location` on `date`. Equivalent to [`extract_listing_product`] followed
/// by [`ListingProduct::into_record`].
///
/// # Errors
///
/// See [`extract_listing_product`].
pub fn extract_product(
    snippet: &Value,
    category: &CategoryPair,
    location: &Location,
    date: NaiveDate,
) -> Result<Option<ProductRecord>, ScraperError> {
    Ok(extract_listing_product(snippet)?
        .map(|product| product.into_record(category, location, date)))
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
