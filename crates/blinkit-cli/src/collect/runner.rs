//! The enumeration loop and the failure boundary around it.

use std::time::Duration;

use anyhow::Context;
use blinkit_core::{CategoryPair, Location};
use blinkit_scraper::{describe_shape, extract_product, listing_snippets, ListingSession};

use super::sink::ProductCollector;

/// Depth of the envelope outline logged when a listing cannot be unpacked.
const ENVELOPE_OUTLINE_DEPTH: usize = 3;

/// Fetches every (category, location) pair, categories outer and locations
/// inner, and pushes each extracted product into `collector` in that order.
///
/// Envelopes without `response.snippets` are logged and skipped. Any fetch
/// or extraction error stops the loop immediately; rows collected before the
/// failure stay in `collector`.
///
/// `inter_request_delay` is slept after every request, including the last.
pub(crate) async fn collect_listings<S: ListingSession>(
    session: &S,
    categories: &[CategoryPair],
    locations: &[Location],
    inter_request_delay: Duration,
    collector: &mut ProductCollector,
) -> anyhow::Result<()> {
    let total = categories.len() * locations.len();
    let mut processed = 0usize;

    for category in categories {
        for location in locations {
            tracing::info!(
                processed,
                total,
                category = %category,
                location = %location,
                "processing combination"
            );

            let envelope = session
                .fetch_listing(category, location)
                .await
                .with_context(|| format!("fetching listing for {category} at {location}"))?;

            match listing_snippets(&envelope) {
                Ok(snippets) => {
                    tracing::info!(
                        snippets = snippets.len(),
                        category = %category,
                        "found {} snippets",
                        snippets.len()
                    );
                    let date = chrono::Local::now().date_naive();
                    for snippet in snippets {
                        let record = extract_product(snippet, category, location, date)
                            .with_context(|| {
                                format!("extracting product for {category} at {location}")
                            })?;
                        if let Some(record) = record {
                            collector.push(record);
                        }
                    }
                }
                Err(issue) => {
                    tracing::warn!(
                        category = %category,
                        location = %location,
                        %issue,
                        "skipping listing"
                    );
                    tracing::debug!(
                        outline = %describe_shape(&envelope, ENVELOPE_OUTLINE_DEPTH),
                        "unexpected listing envelope"
                    );
                }
            }

            processed += 1;
            if !inter_request_delay.is_zero() {
                tokio::time::sleep(inter_request_delay).await;
            }
        }
    }

    tracing::info!(processed, total, "finished processing combinations");
    Ok(())
}

/// Runs the warm-up and the enumeration loop as one unit of failure, then
/// closes `session` whether or not the unit succeeded.
pub(crate) async fn run_with_session<S: ListingSession>(
    mut session: S,
    categories: &[CategoryPair],
    locations: &[Location],
    inter_request_delay: Duration,
    collector: &mut ProductCollector,
) -> anyhow::Result<()> {
    let outcome = async {
        session
            .warm_up()
            .await
            .context("warming up storefront session")?;
        collect_listings(
            &session,
            categories,
            locations,
            inter_request_delay,
            collector,
        )
        .await
    }
    .await;

    session.close();
    outcome
}
