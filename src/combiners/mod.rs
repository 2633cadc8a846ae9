//! Combine functions: the create / add / merge / finish contract every
//! aggregation in this crate is driven through.
//!
//! - [`MetricCombiner`] -- one running metric over plain values.
//! - [`GroupAll`] -- several metrics over all records, as one group.
//! - [`GroupBy`] -- several metrics per group, groups chosen by a router.
//! - [`DistributionCombiner`] -- an approximate distribution of one field.
//!
//! Each combiner names its accumulator type (`A`) and output type (`O`).
//! Accumulators merge associatively and commutatively, so a [`Runner`](crate::runner::Runner)
//! may split the input and merge partials in any grouping.
//!
//! # Examples
//! ```
//! use serde_json::json;
//! use tallybeam::combiners::GroupAll;
//! use tallybeam::metric::Metric;
//! use tallybeam::record::Record;
//! use tallybeam::runner::Runner;
//!
//! let records: Vec<Record> = (1..=4)
//!     .map(|v| Record::new().with("x", json!(v)))
//!     .collect();
//! let comb = GroupAll::new(vec![Metric::count(), Metric::sum("x")]);
//! let out = Runner::parallel(2).combine(&comb, records)?;
//! assert_eq!(out.field_as_number("COUNT"), Some(4.0));
//! assert_eq!(out.field_as_number("SUM(x)"), Some(10.0));
//! # anyhow::Result::<()>::Ok(())
//! ```

mod distribution;
mod group;
mod metric;

pub use distribution::DistributionCombiner;
pub use group::{GroupAll, GroupBy, group_by_fields};
pub use metric::MetricCombiner;

/// An aggregation expressed as an accumulator lifecycle.
///
/// `merge` must be associative and commutative, and `create` must return
/// its identity.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}
