//! Adapter from a [`RankSketch`] to a distribution output table.

use super::{RankSketch, TDigest};
use crate::distribution::points::{PointSpec, equidistant_points};
use crate::distribution::{DistributionTable, DistributionType, TableMetadata};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const QUANTILE_FIELD: &str = "Quantile";
pub const VALUE_FIELD: &str = "Value";
pub const PROBABILITY_FIELD: &str = "Probability";
pub const COUNT_FIELD: &str = "Count";
pub const RANGE_FIELD: &str = "Range";

const NEGATIVE_INFINITY_START: &str = "(-∞";
const POSITIVE_INFINITY_END: &str = "+∞)";
const START_INCLUSIVE: &str = "[";
const END_EXCLUSIVE: &str = ")";
const SEPARATOR: &str = " to ";

/// A rank sketch bound to a distribution type and its query points.
///
/// Constructed either with a count of equidistant points, placed when the
/// result is produced (over `[0, 1]` for `QUANTILE`, over the observed
/// `[min, max]` otherwise), or with an explicit ascending list of points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantileSketch<S = TDigest> {
    sketch: S,
    entries: usize,
    rounding: u32,
    distribution_type: DistributionType,
    points: PointSpec,
}

impl<S: RankSketch> QuantileSketch<S> {
    /// Sketch whose `count` points are generated equidistantly at result time.
    #[must_use]
    pub fn equidistant(
        entries: usize,
        rounding: u32,
        distribution_type: DistributionType,
        count: usize,
    ) -> Self {
        Self::from_spec(entries, rounding, distribution_type, PointSpec::Equidistant(count))
    }

    /// Sketch queried at explicit, ascending, distinct `points`.
    #[must_use]
    pub fn with_points(entries: usize, distribution_type: DistributionType, points: Vec<f64>) -> Self {
        Self::from_spec(entries, 0, distribution_type, PointSpec::Explicit(points))
    }

    pub(crate) fn from_spec(
        entries: usize,
        rounding: u32,
        distribution_type: DistributionType,
        points: PointSpec,
    ) -> Self {
        Self {
            sketch: S::with_entries(entries),
            entries,
            rounding,
            distribution_type,
            points,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.sketch.update(value);
    }

    /// Combine another partial built from the same configuration.
    ///
    /// # Panics
    ///
    /// Panics if `other` has a different distribution type or point spec.
    pub fn merge(&mut self, other: &Self) {
        assert!(
            self.distribution_type == other.distribution_type && self.points == other.points,
            "cannot merge {} sketch with {:?} into {} sketch with {:?}",
            other.distribution_type,
            other.points,
            self.distribution_type,
            self.points
        );
        self.sketch.merge(&other.sketch);
    }

    #[must_use]
    pub const fn distribution_type(&self) -> DistributionType {
        self.distribution_type
    }

    #[must_use]
    pub const fn point_spec(&self) -> &PointSpec {
        &self.points
    }

    #[must_use]
    pub const fn sketch(&self) -> &S {
        &self.sketch
    }

    /// The query points as they would be used right now. Equidistant
    /// `PMF`/`CDF` points depend on the observed range and are empty until a
    /// value has been ingested.
    #[must_use]
    pub fn domain(&self) -> Vec<f64> {
        match &self.points {
            PointSpec::Explicit(points) => points.clone(),
            PointSpec::Equidistant(count) => match self.distribution_type {
                DistributionType::Quantile => equidistant_points(0.0, 1.0, *count, self.rounding),
                DistributionType::Pmf | DistributionType::Cdf => {
                    match (self.sketch.min(), self.sketch.max()) {
                        (Some(min), Some(max)) => {
                            equidistant_points(min, max, *count, self.rounding)
                        }
                        _ => Vec::new(),
                    }
                }
            },
        }
    }

    /// Render the distribution table. An empty sketch yields no rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn result(&self) -> DistributionTable {
        let metadata = TableMetadata {
            entries: self.entries,
            item_count: self.sketch.count(),
            minimum: self.sketch.min(),
            maximum: self.sketch.max(),
        };
        let rows = if self.sketch.is_empty() {
            Vec::new()
        } else {
            let domain = self.domain();
            let n = self.sketch.count() as f64;
            match self.distribution_type {
                DistributionType::Quantile => quantile_rows(&domain, &self.sketch.quantiles(&domain)),
                DistributionType::Pmf => mass_rows(&domain, &self.sketch.pmf(&domain), n, pmf_range),
                DistributionType::Cdf => mass_rows(&domain, &self.sketch.cdf(&domain), n, cdf_range),
            }
        };
        DistributionTable {
            distribution_type: self.distribution_type,
            rows,
            metadata,
        }
    }
}

fn quantile_rows(domain: &[f64], values: &[f64]) -> Vec<Record> {
    domain
        .iter()
        .zip(values)
        .map(|(&q, &v)| {
            Record::new()
                .with(QUANTILE_FIELD, Value::from(q))
                .with(VALUE_FIELD, Value::from(v))
        })
        .collect()
}

fn mass_rows(domain: &[f64], masses: &[f64], n: f64, range: fn(&[f64], usize) -> String) -> Vec<Record> {
    masses
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            Record::new()
                .with(RANGE_FIELD, Value::from(range(domain, i)))
                .with(COUNT_FIELD, Value::from(p * n))
                .with(PROBABILITY_FIELD, Value::from(p))
        })
        .collect()
}

/// `(-∞ to p0)`, `[p0 to p1)`, ..., `[pn to +∞)`.
fn pmf_range(domain: &[f64], i: usize) -> String {
    let start = if i == 0 {
        NEGATIVE_INFINITY_START.to_string()
    } else {
        format!("{START_INCLUSIVE}{:?}", domain[i - 1])
    };
    let end = domain
        .get(i)
        .map_or_else(|| POSITIVE_INFINITY_END.to_string(), |p| format!("{p:?}{END_EXCLUSIVE}"));
    format!("{start}{SEPARATOR}{end}")
}

/// `(-∞ to p0)`, `(-∞ to p1)`, ..., `(-∞ to +∞)`.
fn cdf_range(domain: &[f64], i: usize) -> String {
    let end = domain
        .get(i)
        .map_or_else(|| POSITIVE_INFINITY_END.to_string(), |p| format!("{p:?}{END_EXCLUSIVE}"));
    format!("{NEGATIVE_INFINITY_START}{SEPARATOR}{end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_ranges_cover_the_line() {
        let domain = [1.0, 2.5];
        assert_eq!(pmf_range(&domain, 0), "(-∞ to 1.0)");
        assert_eq!(pmf_range(&domain, 1), "[1.0 to 2.5)");
        assert_eq!(pmf_range(&domain, 2), "[2.5 to +∞)");
    }

    #[test]
    fn cdf_ranges_share_the_open_start() {
        let domain = [0.5];
        assert_eq!(cdf_range(&domain, 0), "(-∞ to 0.5)");
        assert_eq!(cdf_range(&domain, 1), "(-∞ to +∞)");
    }
}
