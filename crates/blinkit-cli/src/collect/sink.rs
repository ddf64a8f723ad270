//! Aggregation of product rows across a run, and the files a run leaves
//! behind: the products CSV and, on failure, a JSON error artifact.

use std::path::{Path, PathBuf};

use anyhow::Context;
use blinkit_core::ProductRecord;
use serde::Serialize;

/// Ordered product rows for one run, in the order they were found.
#[derive(Debug, Default)]
pub(crate) struct ProductCollector {
    records: Vec<ProductRecord>,
}

impl ProductCollector {
    pub(crate) fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Writes all rows to `{dir}/blinkit_products_{timestamp}.csv`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when there are no
    /// rows.
    pub(crate) fn write_csv(&self, dir: &Path, timestamp: &str) -> anyhow::Result<Option<PathBuf>> {
        if self.records.is_empty() {
            return Ok(None);
        }

        let path = dir.join(format!("blinkit_products_{timestamp}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        for record in &self.records {
            writer
                .serialize(record)
                .with_context(|| format!("writing row to {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;

        Ok(Some(path))
    }
}

#[derive(Debug, Serialize)]
struct ErrorArtifact<'a> {
    error: String,
    timestamp: String,
    url: &'a str,
}

/// Writes `{dir}/exception_{timestamp}.json` describing a failed run.
pub(crate) fn write_error_artifact(
    dir: &Path,
    timestamp: &str,
    error: &anyhow::Error,
    url: &str,
) -> anyhow::Result<PathBuf> {
    let artifact = ErrorArtifact {
        error: format!("{error:#}"),
        timestamp: chrono::Local::now().to_rfc3339(),
        url,
    };
    let path = dir.join(format!("exception_{timestamp}.json"));
    let body = serde_json::to_string_pretty(&artifact).context("serializing error artifact")?;
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(variant_id: &str, selling_price: f64) -> ProductRecord {
        ProductRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            l1_category: "Munchies".to_owned(),
            l1_category_id: "1237".to_owned(),
            l2_category: "Chips".to_owned(),
            l2_category_id: "940".to_owned(),
            store_id: "30526".to_owned(),
            variant_id: variant_id.to_owned(),
            variant_name: "Lay's Classic Salted".to_owned(),
            group_id: "88".to_owned(),
            selling_price,
            mrp: 20.0,
            in_stock: true,
            inventory: 4,
            is_sponsored: true,
            image_url: String::new(),
            brand_id: "NA".to_owned(),
            brand: "Lay's".to_owned(),
            latitude: "12.9716".to_owned(),
            longitude: "77.5946".to_owned(),
        }
    }

    #[test]
    fn empty_collector_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let collector = ProductCollector::default();
        let written = collector.write_csv(dir.path(), "20240301_101500").unwrap();
        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn csv_has_header_and_rows_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut collector = ProductCollector::default();
        collector.push(record("b-2", 20.0));
        collector.push(record("a-1", 18.0));

        let path = collector
            .write_csv(dir.path(), "20240301_101500")
            .unwrap()
            .expect("expected a CSV path");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "blinkit_products_20240301_101500.csv"
        );

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], ProductRecord::CSV_HEADER.join(","));
        assert!(lines[1].contains(",b-2,"));
        assert!(lines[2].contains(",a-1,"));
    }

    #[test]
    fn collector_counts_pushed_rows() {
        let mut collector = ProductCollector::default();
        assert!(collector.is_empty());
        collector.push(record("1", 20.0));
        collector.push(record("2", 18.0));
        assert_eq!(collector.len(), 2);
        assert_eq!(collector.records()[1].variant_id, "2");
    }

    #[test]
    fn error_artifact_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let err = anyhow::anyhow!("connection reset").context("fetching listing for Munchies > Chips");
        let path = write_error_artifact(
            dir.path(),
            "20240301_101500",
            &err,
            "https://blinkit.com/v1/layout/listing_widgets",
        )
        .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "exception_20240301_101500.json"
        );

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value["error"],
            "fetching listing for Munchies > Chips: connection reset"
        );
        assert_eq!(value["url"], "https://blinkit.com/v1/layout/listing_widgets");
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
