//! Browser-profile HTTP session for the storefront's listing API.

use std::time::Duration;

use blinkit_core::{AppConfig, CategoryPair, Location};
use reqwest::Client;
use serde_json::Value;

use crate::error::ScraperError;
use crate::listing::{listing_url, storefront_origin};

/// The fetch loop's view of a storefront session.
///
/// A session is acquired once per run, warmed up, used for every listing
/// request, and then consumed by [`ListingSession::close`] on every exit
/// path.
#[allow(async_fn_in_trait)]
pub trait ListingSession {
    /// Visits the storefront so the session carries whatever cookies the
    /// site sets before listing calls are made.
    async fn warm_up(&mut self) -> Result<(), ScraperError>;

    /// Requests the listing for one category as seen from one location and
    /// returns the raw JSON envelope.
    async fn fetch_listing(
        &self,
        category: &CategoryPair,
        location: &Location,
    ) -> Result<Value, ScraperError>;

    /// Releases the session.
    fn close(self);
}

/// Cookie-carrying HTTP session that presents itself as a desktop browser.
///
/// Requests are made one at a time and never retried. Status codes are
/// logged but never fail a call; transport errors and non-JSON listing
/// bodies are returned to the caller.
pub struct BrowserSession {
    client: Client,
    origin: String,
    warmup_delay: Duration,
}

impl BrowserSession {
    /// Creates a session for the storefront at `base_url`.
    ///
    /// `timeout_secs = None` sets no request timeout. No network I/O happens
    /// until [`ListingSession::warm_up`] or [`ListingSession::fetch_listing`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` has no usable
    /// origin, or [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_secs: Option<u64>,
        warmup_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(user_agent);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let origin = storefront_origin(base_url)?;
        let client = builder.build()?;

        Ok(Self {
            client,
            origin,
            warmup_delay: Duration::from_millis(warmup_delay_ms),
        })
    }

    /// Creates a session from the application config.
    ///
    /// # Errors
    ///
    /// See [`BrowserSession::new`].
    pub fn open(config: &AppConfig) -> Result<Self, ScraperError> {
        tracing::info!(
            base_url = %config.base_url,
            "initializing browser session"
        );
        Self::new(
            &config.base_url,
            &config.user_agent,
            config.request_timeout_secs,
            config.warmup_delay_ms,
        )
    }

    fn referer(&self) -> String {
        format!("{}/", self.origin)
    }
}

impl ListingSession for BrowserSession {
    async fn warm_up(&mut self) -> Result<(), ScraperError> {
        let url = self.referer();
        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Challenge pages arrive as 403/503; the settle delay still applies.
            tracing::warn!(
                %url,
                status = status.as_u16(),
                "storefront visit returned non-success status"
            );
        }
        // Drain the page so the connection can be reused.
        response.bytes().await?;

        if !self.warmup_delay.is_zero() {
            tracing::debug!(
                delay = ?self.warmup_delay,
                "waiting for storefront session to settle"
            );
            tokio::time::sleep(self.warmup_delay).await;
        }
        Ok(())
    }

    async fn fetch_listing(
        &self,
        category: &CategoryPair,
        location: &Location,
    ) -> Result<Value, ScraperError> {
        let url = listing_url(&self.origin, category)?;

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CONNECTION, "keep-alive")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ORIGIN, &self.origin)
            .header(reqwest::header::REFERER, self.referer())
            .header("lat", &location.latitude)
            .header("lon", &location.longitude)
            .send()
            .await?;

        // Error bodies are still parsed: a JSON body without `response` is
        // skipped by the caller, anything else fails as a parse error.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                %url,
                status = status.as_u16(),
                "listing request returned non-success status"
            );
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("listing for {category} at {location} (HTTP {})", status.as_u16()),
            source: e,
        })
    }

    fn close(self) {
        tracing::info!(origin = %self.origin, "browser session released");
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
