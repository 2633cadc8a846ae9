//! Rank sketches: bounded-memory, mergeable approximations of a numeric
//! distribution.
//!
//! - [`RankSketch`] -- the contract any sketch must meet to back a
//!   distribution aggregation.
//! - [`TDigest`] -- the default implementation.
//! - [`QuantileSketch`] -- adapter that pairs a sketch with a distribution type
//!   and query points, and renders the final [`DistributionTable`](crate::distribution::DistributionTable).

mod quantile;
mod tdigest;

pub use quantile::QuantileSketch;
pub use tdigest::TDigest;

/// A mergeable accumulator of numeric values answering rank queries.
///
/// `merge` must be commutative and associative up to the sketch's error
/// bound, so partial sketches may be combined in any order or grouping.
pub trait RankSketch: Clone + Send + Sync + 'static {
    /// A sketch sized by an `entries` budget (larger is more accurate).
    fn with_entries(entries: usize) -> Self;

    /// Ingest one value.
    fn update(&mut self, value: f64);

    /// Combine another partial sketch into this one.
    fn merge(&mut self, other: &Self);

    /// Number of values ingested.
    fn count(&self) -> u64;

    fn min(&self) -> Option<f64>;

    fn max(&self) -> Option<f64>;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Estimated values at each rank in `ranks` (each in `[0, 1]`).
    fn quantiles(&self, ranks: &[f64]) -> Vec<f64>;

    /// Cumulative masses at each of the ascending `split_points`, followed by
    /// a final `1.0`. Empty when nothing was ingested.
    fn cdf(&self, split_points: &[f64]) -> Vec<f64>;

    /// Masses of the `n + 1` intervals delimited by the ascending
    /// `split_points`. Empty when nothing was ingested.
    fn pmf(&self, split_points: &[f64]) -> Vec<f64> {
        let cdf = self.cdf(split_points);
        let mut previous = 0.0;
        cdf.into_iter()
            .map(|c| {
                let mass = (c - previous).max(0.0);
                previous = previous.max(c);
                mass
            })
            .collect()
    }
}
