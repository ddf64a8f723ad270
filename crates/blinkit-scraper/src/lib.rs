pub mod envelope;
pub mod error;
pub mod extract;
pub mod listing;
pub mod session;

pub use envelope::{describe_shape, listing_snippets, EnvelopeIssue};
pub use error::ScraperError;
pub use extract::{extract_listing_product, extract_product, ListingProduct, WidgetShape};
pub use listing::{listing_endpoint, listing_url};
pub use session::{BrowserSession, ListingSession};
