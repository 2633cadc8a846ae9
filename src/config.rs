//! Query-time configuration for aggregations.
//!
//! [`AggregationConfig`] holds the operator-level limits (sketch size, point
//! caps, rounding, result sizes). [`Aggregation`] is the per-query
//! description: declared fields, requested size and free-form attributes.
//! Both are plain serde types; every config key is optional and falls back to
//! its default.
//!
//! # Example
//!
//! ```
//! use tallybeam::config::AggregationConfig;
//!
//! let cfg = AggregationConfig::from_json_str(r#"{ "max_points": 20 }"#)?;
//! assert_eq!(cfg.max_points, 20);
//! assert_eq!(cfg.sketch_entries, AggregationConfig::DEFAULT_ENTRIES);
//! # anyhow::Result::<()>::Ok(())
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Free-form aggregation attributes (`type`, `points`, `start`, ...).
pub type Attributes = Map<String, Value>;

/// Operator-level limits read once when an aggregator is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Size budget of each distribution sketch.
    pub sketch_entries: usize,
    /// Upper bound on the number of distribution points.
    pub max_points: usize,
    /// Decimal places kept on generated points.
    pub generated_points_rounding: u32,
    /// Result size used when a query does not ask for one.
    pub default_size: usize,
    /// Hard cap on any query's result size.
    pub max_size: usize,
}

impl AggregationConfig {
    pub const DEFAULT_ENTRIES: usize = 1024;
    pub const DEFAULT_MAX_POINTS: usize = 100;
    pub const DEFAULT_ROUNDING: u32 = 6;
    pub const DEFAULT_SIZE: usize = 500;
    pub const DEFAULT_MAX_SIZE: usize = 500;

    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid aggregation config")
    }

    /// Load from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The effective result size for a query that requested `requested`.
    #[must_use]
    pub fn size_for(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_size).min(self.max_size)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sketch_entries: Self::DEFAULT_ENTRIES,
            max_points: Self::DEFAULT_MAX_POINTS,
            generated_points_rounding: Self::DEFAULT_ROUNDING,
            default_size: Self::DEFAULT_SIZE,
            max_size: Self::DEFAULT_MAX_SIZE,
        }
    }
}

/// The aggregation part of a query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aggregation {
    pub fields: Vec<String>,
    pub size: Option<usize>,
    pub attributes: Option<Attributes>,
}

impl Aggregation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field.
    #[must_use]
    pub fn field<S: Into<String>>(mut self, field: S) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set one attribute, creating the attribute map if needed.
    #[must_use]
    pub fn attribute<S: Into<String>>(mut self, key: S, value: Value) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}
