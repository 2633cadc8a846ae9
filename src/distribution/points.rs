//! Query point resolution for distribution aggregations.
//!
//! Points come from the aggregation attributes, trying in order:
//!
//! 1. `numberOfPoints`: a count of equidistant points, placed by the sketch
//!    when it renders its result. No client-side checks apply.
//! 2. `points`: an explicit list of numbers.
//! 3. `start`, `end`, `increment`: a generated range, `start < end` and
//!    `increment > 0`, each point rounded.
//!
//! Lists from 2 and 3 are deduplicated, sorted ascending, truncated to the
//! point cap and bounds checked (`QUANTILE` points must lie in `[0, 1]`).

use super::DistributionType;
use crate::config::Attributes;
use crate::utils::round;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

pub const TYPE: &str = "type";
pub const POINTS: &str = "points";
pub const RANGE_START: &str = "start";
pub const RANGE_END: &str = "end";
pub const RANGE_INCREMENT: &str = "increment";
pub const NUMBER_OF_POINTS: &str = "numberOfPoints";

/// Where a sketch takes its query points from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointSpec {
    /// This many points, evenly spaced over the type's domain at result time.
    Equidistant(usize),
    /// Distinct points in ascending order.
    Explicit(Vec<f64>),
}

impl PointSpec {
    /// Upper bound on the number of points this spec yields.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Equidistant(n) => *n,
            Self::Explicit(points) => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The requested `numberOfPoints`, truncated toward zero. Missing,
/// non-numeric or negative values give 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn number_of_equidistant_points(attributes: &Attributes) -> usize {
    let Some(value) = attributes.get(NUMBER_OF_POINTS) else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).unwrap_or(usize::MAX);
    }
    match value.as_f64() {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc() as usize,
        _ => 0,
    }
}

/// The numeric, finite entries of the `points` list.
#[must_use]
pub fn provided_points(attributes: &Attributes) -> Vec<f64> {
    attributes
        .get(POINTS)
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_f64)
                .filter(|p| p.is_finite())
                .collect()
        })
        .unwrap_or_default()
}

/// Points `start, start + increment, ...` up to and including `end`, at most
/// `max_points` of them, each rounded to `rounding` places. Empty unless all
/// three attributes are finite numbers with `start < end` and `increment > 0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_points(max_points: usize, rounding: u32, attributes: &Attributes) -> Vec<f64> {
    let number = |key: &str| {
        attributes
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    };
    let (Some(start), Some(end), Some(increment)) =
        (number(RANGE_START), number(RANGE_END), number(RANGE_INCREMENT))
    else {
        return Vec::new();
    };
    if start >= end || increment <= 0.0 {
        return Vec::new();
    }
    (0..max_points)
        .map(|i| (i as f64).mul_add(increment, start))
        .take_while(|&p| p <= end)
        .map(|p| round(p, rounding))
        .collect()
}

/// Distinct points in ascending order, the first `max_points` of them.
#[must_use]
pub fn clean_points(points: &[f64], max_points: usize) -> Vec<f64> {
    points
        .iter()
        .copied()
        .map(OrderedFloat)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(max_points)
        .map(OrderedFloat::into_inner)
        .collect()
}

/// Whether the sorted `points` are unusable for `distribution_type`.
#[must_use]
pub fn has_invalid_bounds(distribution_type: DistributionType, points: &[f64]) -> bool {
    match (points.first(), points.last()) {
        (Some(&first), Some(&last)) => {
            distribution_type == DistributionType::Quantile && (first < 0.0 || last > 1.0)
        }
        _ => true,
    }
}

/// Resolve the query points, or `None` when no usable points result.
#[must_use]
pub fn resolve_points(
    distribution_type: DistributionType,
    max_points: usize,
    rounding: u32,
    attributes: &Attributes,
) -> Option<PointSpec> {
    let equidistant = number_of_equidistant_points(attributes);
    if equidistant > 0 {
        return Some(PointSpec::Equidistant(equidistant.min(max_points)));
    }

    let mut points = provided_points(attributes);
    if points.is_empty() {
        points = generate_points(max_points, rounding, attributes);
    }
    let points = clean_points(&points, max_points);
    if has_invalid_bounds(distribution_type, &points) {
        return None;
    }
    Some(PointSpec::Explicit(points))
}

/// `count` evenly spaced points from `start` to `end` inclusive, rounded to
/// `rounding` places. Rounding may collapse neighbours; duplicates are
/// dropped.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn equidistant_points(start: f64, end: f64, count: usize, rounding: u32) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 || start == end {
        return vec![round(start, rounding)];
    }
    let step = (end - start) / (count - 1) as f64;
    let mut points: Vec<f64> = (0..count)
        .map(|i| {
            if i == count - 1 {
                end
            } else {
                (i as f64).mul_add(step, start)
            }
        })
        .map(|p| round(p, rounding))
        .collect();
    points.dedup();
    points
}
