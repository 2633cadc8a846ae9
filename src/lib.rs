//! # Tallybeam
//!
//! The **approximate aggregation core** of a streaming query engine. Records
//! arrive at many independent workers; each worker keeps per-group running
//! metrics and per-field approximate distributions, and the partial results
//! are later merged into one answer without replaying any record.
//!
//! ## Key Features
//!
//! - **Mergeable metrics** - COUNT, SUM, MIN, MAX and AVG, with AVG stored as
//!   `(sum, count)` so partials combine exactly
//! - **Group state with cheap copies** - group keys are shared immutably,
//!   metric maps are owned, and new groups are partial copies of a template
//! - **Approximate distributions** - QUANTILE, PMF and CDF tables from a
//!   mergeable t-digest, with points given explicitly, as a range, or as a
//!   count of equidistant points
//! - **Validation that reports everything** - configuration problems come back
//!   as a list of structured errors with resolution hints
//! - **Sequential and parallel execution** - a rayon runner that tree-merges
//!   partials with a bounded fanout
//!
//! ## Quick Start
//!
//! ```
//! use serde_json::json;
//! use tallybeam::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records: Vec<Record> = [("api", 120), ("api", 80), ("web", 40)]
//!     .into_iter()
//!     .map(|(service, latency)| {
//!         Record::new()
//!             .with("service", json!(service))
//!             .with("latency", json!(latency))
//!     })
//!     .collect();
//!
//! let by_service = group_by_fields(
//!     vec![Metric::count(), Metric::avg("latency")],
//!     vec!["service".to_string()],
//! );
//! let groups = Runner::default().combine(&by_service, records)?;
//!
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].field_as_string("service"), "api");
//! assert_eq!(groups[0].field_as_number("AVG(latency)"), Some(100.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Metrics and group state
//!
//! A [`Metric`] names a statistic over a field; its running value is a
//! [`MetricValue`]. A [`GroupState`] holds one value per metric for one
//! group key. [`CachedGroupState`] adds partial copies and a cached record
//! for high ingest rates, and [`GroupSummary`] maps keys to groups for one
//! partition.
//!
//! ### Distributions
//!
//! A [`Distribution`] is configured from an [`Aggregation`] and an
//! [`AggregationConfig`], validated once with `initialize`, fed records and
//! merged, then finished into a [`DistributionTable`]. Query points are
//! resolved by the functions in [`distribution::points`].
//!
//! ### Sketches
//!
//! [`RankSketch`] is the contract a mergeable rank estimator meets;
//! [`TDigest`] implements it, and [`QuantileSketch`] binds one to a
//! distribution type and its points.
//!
//! ### Combiners and the runner
//!
//! Every aggregation is also a [`CombineFn`] (`create`, `add_input`, `merge`,
//! `finish`). The [`Runner`] executes a combiner sequentially or in parallel;
//! both modes give the same result.
//!
//! ## Error handling
//!
//! - Configuration errors: [`ValidationResult`], a list of
//!   [`ValidationError`]s, each with an [`ErrorCode`].
//! - Records missing a field, or holding a non-numeric value: skipped
//!   silently for that metric or sketch.
//! - Merging mismatched partials: a panic, since it is a programming error.
//! - File and thread-pool failures: `anyhow::Result`.
//!
//! ## Logging
//!
//! Events are emitted with `tracing`; install a subscriber to see them.

pub mod combiners;
pub mod config;
pub mod distribution;
pub mod grouping;
pub mod metric;
pub mod record;
pub mod runner;
pub mod sketch;
pub mod testing;
pub mod utils;
pub mod validation;

// General re-exports
pub use combiners::{
    CombineFn, DistributionCombiner, GroupAll, GroupBy, MetricCombiner, group_by_fields,
};
pub use config::{Aggregation, AggregationConfig, Attributes};
pub use distribution::{
    Distribution, DistributionPlan, DistributionTable, DistributionType, Phase, PointSpec,
};
pub use grouping::{CachedGroupState, GroupKey, GroupState, GroupSummary};
pub use metric::{Metric, MetricKind, MetricValue};
pub use record::{Record, extract_field_as_number};
pub use runner::{ExecMode, Runner};
pub use sketch::{QuantileSketch, RankSketch, TDigest};
pub use validation::{ErrorCode, ValidationError, ValidationResult};
