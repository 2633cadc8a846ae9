//! Approximate distribution aggregation over one numeric field.
//!
//! A [`Distribution`] is configured from an [`Aggregation`](crate::config::Aggregation),
//! validated once with [`Distribution::initialize`], fed records, merged with
//! other partials and finally rendered as a [`DistributionTable`].
//!
//! ```
//! use serde_json::json;
//! use tallybeam::config::{Aggregation, AggregationConfig};
//! use tallybeam::distribution::Distribution;
//! use tallybeam::record::Record;
//!
//! let agg = Aggregation::new()
//!     .field("latency")
//!     .attribute("type", json!("QUANTILE"))
//!     .attribute("points", json!([0.5, 1.0]));
//! let mut dist = Distribution::new(&agg, &AggregationConfig::default());
//! dist.initialize().expect("valid configuration");
//! for v in 1..=9 {
//!     dist.consume(&Record::new().with("latency", json!(v)));
//! }
//! let table = dist.finish().expect("ready");
//! assert_eq!(table.rows.len(), 2);
//! assert_eq!(table.rows[1].field_as_number("Value"), Some(9.0));
//! ```

mod aggregator;
pub mod points;
mod table;

pub use aggregator::{Distribution, DistributionPlan, Phase};
pub use points::PointSpec;
pub use table::{DistributionTable, TableMetadata};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The output a distribution aggregation produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DistributionType {
    /// Values at the requested ranks.
    Quantile,
    /// Probability mass of each interval between points.
    Pmf,
    /// Cumulative mass up to each point.
    Cdf,
}

impl DistributionType {
    pub const ALL: [Self; 3] = [Self::Quantile, Self::Pmf, Self::Cdf];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quantile => "QUANTILE",
            Self::Pmf => "PMF",
            Self::Cdf => "CDF",
        }
    }

    /// Case-sensitive lookup by canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
