//! URL construction for the storefront's listing endpoint.

use blinkit_core::CategoryPair;

use crate::error::ScraperError;

const LISTING_PATH: &str = "/v1/layout/listing_widgets";

/// Returns the scheme+host(+port) origin of a storefront URL.
///
/// Given `"https://blinkit.com/cn/dairy"`, returns `"https://blinkit.com"`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse or
/// has no host.
pub(crate) fn storefront_origin(base_url: &str) -> Result<String, ScraperError> {
    let url = reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if !url.has_host() {
        return Err(ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL has no host".to_owned(),
        });
    }
    Ok(url.origin().ascii_serialization())
}

/// Returns the listing endpoint without query parameters. This is the URL
/// recorded in error artifacts.
///
/// # Errors
///
/// See [`storefront_origin`].
pub fn listing_endpoint(base_url: &str) -> Result<String, ScraperError> {
    Ok(format!("{}{LISTING_PATH}", storefront_origin(base_url)?))
}

/// Builds the listing URL for one category: the level-1 id goes in `l0_cat`
/// and the level-2 id in `l1_cat`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not a usable
/// storefront URL.
pub fn listing_url(base_url: &str, category: &CategoryPair) -> Result<String, ScraperError> {
    let endpoint = listing_endpoint(base_url)?;
    let mut url = reqwest::Url::parse(&endpoint).map_err(|e| ScraperError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: format!("endpoint \"{endpoint}\" is not a valid URL: {e}"),
    })?;

    url.query_pairs_mut()
        .append_pair("l0_cat", &category.l1_category_id)
        .append_pair("l1_cat", &category.l2_category_id);

    Ok(url.to_string())
}
