use super::DistributionType;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Summary of the sketch a table was rendered from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub entries: usize,
    pub item_count: u64,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Final output of a distribution aggregation: one row per point (or per
/// interval for `PMF`/`CDF`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionTable {
    #[serde(rename = "type")]
    pub distribution_type: DistributionType,
    pub rows: Vec<Record>,
    pub metadata: TableMetadata,
}

impl DistributionTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` in row order; rows where it is not numeric are skipped.
    #[must_use]
    pub fn column(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.field_as_number(column))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
