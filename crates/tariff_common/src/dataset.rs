//! Dataset accessor - loads the static tariff CSV once per process start.
//!
//! One row per country; the Country column is the unique key. If the file
//! carries duplicate keys the first row wins.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// The per-country fact sheet driving both display and prompt context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "Country")]
    pub country: String,

    /// Tariff imposed by the US, in percent.
    #[serde(rename = "Tariff Imposed by US (%)")]
    pub tariff_rate: f64,

    /// Estimated annual import value, in billion USD.
    #[serde(rename = "Estimated Annual Import Value (Billion USD)")]
    pub import_value: f64,

    #[serde(rename = "Top Product Categories")]
    pub top_categories: String,

    #[serde(rename = "Specific Product Names")]
    pub specific_products: String,

    #[serde(rename = "Alternative Suppliers")]
    pub alternative_suppliers: String,

    #[serde(rename = "Use Case Impact")]
    pub use_case_impact: String,
}

/// Dataset errors are fatal at startup: no rows, no dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] csv::Error),

    #[error("dataset contains no rows")]
    Empty,
}

/// Read-only tariff dataset. Loaded once, never mutated, shared freely.
#[derive(Debug, Clone)]
pub struct TariffDataset {
    records: Vec<CountryRecord>,
}

impl TariffDataset {
    /// Load the dataset from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Load the dataset from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize() {
            let record: CountryRecord = row?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        tracing::debug!(rows = records.len(), "tariff dataset loaded");
        Ok(Self { records })
    }

    /// Look up a country's record. First match wins on duplicate keys.
    pub fn lookup(&self, country: &str) -> Option<&CountryRecord> {
        self.records.iter().find(|r| r.country == country)
    }

    /// Country keys in file order, de-duplicated.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.country.as_str()) {
                seen.push(record.country.as_str());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
