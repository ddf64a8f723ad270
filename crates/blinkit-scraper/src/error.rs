use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("product {product_id} has no {field} price")]
    MissingPrice {
        field: &'static str,
        product_id: String,
    },

    #[error("product {product_id} has unparseable {field} price \"{raw}\"")]
    InvalidPrice {
        field: &'static str,
        product_id: String,
        raw: String,
    },
}
