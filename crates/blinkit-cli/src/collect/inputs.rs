//! Readers for the two input tables that define a run: category pairs and
//! delivery locations.

use std::path::Path;

use anyhow::Context;
use blinkit_core::{CategoryPair, Location};
use serde::de::DeserializeOwned;

/// Reads `l1_category, l1_category_id, l2_category, l2_category_id` rows.
pub(crate) fn read_categories(path: &Path) -> anyhow::Result<Vec<CategoryPair>> {
    read_rows(path, "categories")
}

/// Reads `latitude, longitude` rows.
pub(crate) fn read_locations(path: &Path) -> anyhow::Result<Vec<Location>> {
    read_rows(path, "locations")
}

fn read_rows<T: DeserializeOwned>(path: &Path, label: &str) -> anyhow::Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {label} file {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| {
            // +2: one for the header, one for 1-based line numbers.
            row.with_context(|| format!("reading {label} line {} of {}", idx + 2, path.display()))
        })
        .collect()
}
