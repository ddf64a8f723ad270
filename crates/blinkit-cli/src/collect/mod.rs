//! The `collect` command: walk every category at every location, extract
//! listed products, and export them to a timestamped CSV.
//!
//! A run is all-or-nothing with respect to errors: the first fetch or
//! extraction failure aborts the remaining combinations. Rows gathered
//! before the failure are still written, next to an `exception_*.json`
//! artifact describing what went wrong.

mod inputs;
mod runner;
mod sink;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use blinkit_core::{AppConfig, CategoryPair, Location};
use blinkit_scraper::{listing_endpoint, BrowserSession, ListingSession};
use clap::Args;

use self::inputs::{read_categories, read_locations};
use self::runner::run_with_session;
use self::sink::{write_error_artifact, ProductCollector};

/// Overrides for the configured input and output locations.
#[derive(Debug, Default, Args)]
pub(crate) struct CollectArgs {
    /// Categories CSV (l1_category, l1_category_id, l2_category, l2_category_id)
    #[arg(long)]
    pub categories: Option<PathBuf>,

    /// Locations CSV (latitude, longitude)
    #[arg(long)]
    pub locations: Option<PathBuf>,

    /// Directory for the products CSV and error artifacts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl CollectArgs {
    pub(crate) fn apply(self, config: &mut AppConfig) {
        if let Some(path) = self.categories {
            config.categories_path = path;
        }
        if let Some(path) = self.locations {
            config.locations_path = path;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
    }
}

/// Where and how one run writes its results.
struct RunPlan<'a> {
    output_dir: &'a Path,
    timestamp: &'a str,
    /// Listing endpoint recorded in the error artifact.
    endpoint: String,
    inter_request_delay: Duration,
}

/// What a successful run produced.
#[derive(Debug)]
struct RunSummary {
    products: usize,
    csv_path: Option<PathBuf>,
}

/// Runs a full collection with the given configuration.
///
/// # Errors
///
/// Returns an error if the output directory cannot be created, an input file
/// cannot be read, the session cannot be built, or the run itself fails. In
/// the last case an error artifact has already been written.
pub(crate) async fn run_collect(config: &AppConfig) -> anyhow::Result<()> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

    let categories = read_categories(&config.categories_path)?;
    let locations = read_locations(&config.locations_path)?;
    println!(
        "Found {} categories and {} locations",
        categories.len(),
        locations.len()
    );
    println!(
        "Total combinations to process: {}",
        categories.len() * locations.len()
    );

    let endpoint = listing_endpoint(&config.base_url)?;
    let session = BrowserSession::open(config)?;
    let plan = RunPlan {
        output_dir: &config.output_dir,
        timestamp: &timestamp,
        endpoint,
        inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
    };

    let summary = execute_run(session, &plan, &categories, &locations).await?;
    match summary.csv_path {
        Some(path) => println!("Saved {} products to {}", summary.products, path.display()),
        None => println!("No products found in any response"),
    }
    Ok(())
}

/// Drives one run through `session` and flushes whatever it collected.
///
/// On failure the error artifact is written first, then any partial rows,
/// and the original error is returned.
async fn execute_run<S: ListingSession>(
    session: S,
    plan: &RunPlan<'_>,
    categories: &[CategoryPair],
    locations: &[Location],
) -> anyhow::Result<RunSummary> {
    let mut collector = ProductCollector::default();
    let outcome = run_with_session(
        session,
        categories,
        locations,
        plan.inter_request_delay,
        &mut collector,
    )
    .await;

    if let Err(err) = outcome {
        tracing::error!(error = %format!("{err:#}"), "collection run failed");
        match write_error_artifact(plan.output_dir, plan.timestamp, &err, &plan.endpoint) {
            Ok(path) => println!("Error log saved to {}", path.display()),
            Err(write_err) => tracing::error!(
                error = %format!("{write_err:#}"),
                "failed to write error artifact"
            ),
        }
        if !collector.is_empty() {
            match collector.write_csv(plan.output_dir, plan.timestamp) {
                Ok(Some(path)) => println!(
                    "Saved {} products collected before the failure to {}",
                    collector.len(),
                    path.display()
                ),
                Ok(None) => {}
                Err(write_err) => tracing::error!(
                    error = %format!("{write_err:#}"),
                    "failed to write partial products CSV"
                ),
            }
        }
        return Err(err);
    }

    let csv_path = collector.write_csv(plan.output_dir, plan.timestamp)?;
    tracing::info!(products = collector.len(), "collection run complete");
    Ok(RunSummary {
        products: collector.len(),
        csv_path,
    })
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
