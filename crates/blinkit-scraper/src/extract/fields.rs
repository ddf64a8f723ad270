//! Field-level readers for product objects found in listing snippets.
//!
//! The listing API is loose about types: text may arrive bare or wrapped in
//! `{"text": ...}`, ids may be strings or numbers, and flags may be any
//! JSON value. These helpers turn such values into the plain types a
//! [`blinkit_core::ProductRecord`] needs.

use serde_json::{Map, Value};

use crate::error::ScraperError;

const CURRENCY_SYMBOL: char = '₹';

/// Renders a scalar JSON value as text. Absent and `null` become `""`,
/// strings are taken as-is, anything else uses its JSON form.
#[must_use]
pub fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reads a text field that may be bare or wrapped as `{"text": ...}`.
#[must_use]
pub fn text_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(wrapper)) => scalar_text(wrapper.get("text")),
        other => scalar_text(other),
    }
}

/// Reads a price that may be bare or wrapped as `{"text": "₹1,234.50"}`.
///
/// The currency symbol, thousands separators, and whitespace are stripped
/// before parsing. JSON numbers are accepted directly.
///
/// # Errors
///
/// - [`ScraperError::MissingPrice`] if the field or its `text` is absent or `null`.
/// - [`ScraperError::InvalidPrice`] if the text does not parse as a finite,
///   non-negative number.
pub fn parse_price(
    value: Option<&Value>,
    field: &'static str,
    product_id: &str,
) -> Result<f64, ScraperError> {
    let missing = || ScraperError::MissingPrice {
        field,
        product_id: product_id.to_owned(),
    };

    let raw = match value {
        Some(Value::Object(wrapper)) => wrapper.get("text").ok_or_else(missing)?,
        Some(other) => other,
        None => return Err(missing()),
    };

    let invalid = |raw: String| ScraperError::InvalidPrice {
        field,
        product_id: product_id.to_owned(),
        raw,
    };

    let amount = match raw {
        Value::Null => return Err(missing()),
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(n.to_string()))?,
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| *c != CURRENCY_SYMBOL && *c != ',' && !c.is_whitespace())
                .collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| invalid(text.clone()))?
        }
        other => return Err(invalid(other.to_string())),
    };

    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid(scalar_text(Some(raw))));
    }
    Ok(amount)
}

/// JSON truthiness: `null`, `false`, `0`, and empty strings, arrays, and
/// objects are false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// A product is in stock unless its state is `"out_of_stock"` or it is
/// flagged `is_sold_out`. Either signal alone marks it out of stock.
#[must_use]
pub fn is_in_stock(product: &Map<String, Value>) -> bool {
    let out_of_stock =
        product.get("product_state").and_then(Value::as_str) == Some("out_of_stock");
    let sold_out = is_truthy(product.get("is_sold_out"));
    !(out_of_stock || sold_out)
}

/// Decides whether a listing is a paid placement.
///
/// Products count as sponsored unless the add-to-cart actions under
/// `atc_actions_v2.count_map["0"]` contain a `fetch_api` action. The search
/// stops at the first `fetch_api` action whose `fetch_api` and
/// `extra_params` are objects (a missing key counts as an empty object);
/// the product is organic only if that action's `recommendation_type` is
/// `"DEFAULT"`. Later actions are never consulted, even when the first match
/// carries some other recommendation type.
#[must_use]
pub fn is_sponsored(product: &Map<String, Value>) -> bool {
    let Some(actions) = product
        .get("atc_actions_v2")
        .and_then(Value::as_object)
        .and_then(|atc| atc.get("count_map"))
        .and_then(Value::as_object)
        .and_then(|count_map| count_map.get("0"))
        .and_then(Value::as_array)
    else {
        return true;
    };

    let empty = Map::new();
    for action in actions.iter().filter_map(Value::as_object) {
        if action.get("type").and_then(Value::as_str) != Some("fetch_api") {
            continue;
        }
        let Some(fetch_api) = object_or_empty(action.get("fetch_api"), &empty) else {
            continue;
        };
        let Some(extra_params) = object_or_empty(fetch_api.get("extra_params"), &empty) else {
            continue;
        };
        return extra_params
            .get("recommendation_type")
            .and_then(Value::as_str)
            != Some("DEFAULT");
    }
    true
}

/// `Some(map)` for objects, `Some(empty)` for an absent key, `None` for any
/// other value.
fn object_or_empty<'a>(
    value: Option<&'a Value>,
    empty: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match value {
        None => Some(empty),
        Some(Value::Object(map)) => Some(map),
        Some(_) => None,
    }
}

/// Reads an integer count, defaulting to `0` when absent or unreadable.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn integer_value(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn text_value_unwraps_text_key() {
        assert_eq!(text_value(Some(&json!({"text": "Amul"}))), "Amul");
    }

    #[test]
    fn text_value_wrapper_without_text_is_empty() {
        assert_eq!(text_value(Some(&json!({"color": "red"}))), "");
    }

    #[test]
    fn text_value_stringifies_bare_values() {
        assert_eq!(text_value(Some(&json!("Milk"))), "Milk");
        assert_eq!(text_value(Some(&json!(922))), "922");
        assert_eq!(text_value(None), "");
        assert_eq!(text_value(Some(&Value::Null)), "");
    }

    #[test]
    fn parse_price_strips_symbol_separator_and_whitespace() {
        let price = parse_price(Some(&json!({"text": " ₹1,234.50 "})), "mrp", "1").unwrap();
        assert!((price - 1234.50).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_price_accepts_bare_string_and_number() {
        assert!((parse_price(Some(&json!("₹27")), "mrp", "1").unwrap() - 27.0).abs() < f64::EPSILON);
        assert!((parse_price(Some(&json!(27.5)), "mrp", "1").unwrap() - 27.5).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_price_missing_field_fails() {
        let err = parse_price(None, "normal_price", "19512").unwrap_err();
        assert!(
            matches!(err, ScraperError::MissingPrice { field: "normal_price", ref product_id } if product_id == "19512"),
            "got: {err:?}"
        );
    }

    #[test]
    fn parse_price_wrapper_without_text_fails() {
        let err = parse_price(Some(&json!({})), "mrp", "1").unwrap_err();
        assert!(matches!(err, ScraperError::MissingPrice { .. }), "got: {err:?}");
    }

    #[test]
    fn parse_price_malformed_text_fails_instead_of_zero() {
        let err = parse_price(Some(&json!({"text": "₹abc"})), "mrp", "1").unwrap_err();
        assert!(
            matches!(err, ScraperError::InvalidPrice { ref raw, .. } if raw == "₹abc"),
            "got: {err:?}"
        );
    }

    #[test]
    fn parse_price_empty_text_fails() {
        let err = parse_price(Some(&json!({"text": "₹ "})), "mrp", "1").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidPrice { .. }), "got: {err:?}");
    }

    #[test]
    fn parse_price_rejects_negative_and_non_finite() {
        assert!(parse_price(Some(&json!("-5")), "mrp", "1").is_err());
        assert!(parse_price(Some(&json!("inf")), "mrp", "1").is_err());
        assert!(parse_price(Some(&json!("NaN")), "mrp", "1").is_err());
    }

    #[test]
    fn parse_price_rejects_non_scalar() {
        let err = parse_price(Some(&json!([27])), "mrp", "1").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidPrice { .. }), "got: {err:?}");
    }

    #[test]
    fn in_stock_by_default() {
        assert!(is_in_stock(&obj(json!({}))));
        assert!(is_in_stock(&obj(json!({"product_state": "available", "is_sold_out": false}))));
    }

    #[test]
    fn out_of_stock_state_alone_marks_unavailable() {
        assert!(!is_in_stock(&obj(json!({"product_state": "out_of_stock", "is_sold_out": false}))));
    }

    #[test]
    fn sold_out_flag_alone_marks_unavailable() {
        assert!(!is_in_stock(&obj(json!({"product_state": "available", "is_sold_out": true}))));
    }

    #[test]
    fn sold_out_flag_uses_truthiness() {
        assert!(!is_in_stock(&obj(json!({"is_sold_out": 1}))));
        assert!(is_in_stock(&obj(json!({"is_sold_out": null}))));
    }

    fn with_actions(actions: Value) -> Map<String, Value> {
        obj(json!({"atc_actions_v2": {"count_map": {"0": actions}}}))
    }

    #[test]
    fn sponsored_when_no_actions() {
        assert!(is_sponsored(&obj(json!({}))));
        assert!(is_sponsored(&obj(json!({"atc_actions_v2": null}))));
        assert!(is_sponsored(&with_actions(json!([]))));
    }

    #[test]
    fn sponsored_when_no_fetch_api_action() {
        assert!(is_sponsored(&with_actions(json!([{"type": "add_to_cart"}]))));
    }

    #[test]
    fn organic_when_first_fetch_api_is_default() {
        let product = with_actions(json!([
            {"type": "add_to_cart"},
            {"type": "fetch_api", "fetch_api": {"extra_params": {"recommendation_type": "DEFAULT"}}}
        ]));
        assert!(!is_sponsored(&product));
    }

    #[test]
    fn first_fetch_api_wins_even_when_not_default() {
        let product = with_actions(json!([
            {"type": "fetch_api", "fetch_api": {"extra_params": {"recommendation_type": "ADS"}}},
            {"type": "fetch_api", "fetch_api": {"extra_params": {"recommendation_type": "DEFAULT"}}}
        ]));
        assert!(is_sponsored(&product));
    }

    #[test]
    fn fetch_api_without_params_stops_search() {
        let product = with_actions(json!([
            {"type": "fetch_api"},
            {"type": "fetch_api", "fetch_api": {"extra_params": {"recommendation_type": "DEFAULT"}}}
        ]));
        assert!(is_sponsored(&product));
    }

    #[test]
    fn malformed_fetch_api_is_skipped() {
        let product = with_actions(json!([
            {"type": "fetch_api", "fetch_api": null},
            {"type": "fetch_api", "fetch_api": {"extra_params": "oops"}},
            {"type": "fetch_api", "fetch_api": {"extra_params": {"recommendation_type": "DEFAULT"}}}
        ]));
        assert!(!is_sponsored(&product));
    }

    #[test]
    fn integer_value_reads_numbers_and_strings() {
        assert_eq!(integer_value(Some(&json!(7))), 7);
        assert_eq!(integer_value(Some(&json!(7.9))), 7);
        assert_eq!(integer_value(Some(&json!(" 12 "))), 12);
        assert_eq!(integer_value(Some(&json!("many"))), 0);
        assert_eq!(integer_value(None), 0);
    }
}
