mod common;

use common::attrs;
use serde_json::json;
use tallybeam::distribution::DistributionType;
use tallybeam::distribution::points::{
    PointSpec, clean_points, generate_points, has_invalid_bounds, number_of_equidistant_points,
    provided_points, resolve_points,
};
use tallybeam::testing::assert_points_equal;

const MAX_POINTS: usize = 100;
const ROUNDING: u32 = 6;

fn explicit(spec: Option<PointSpec>) -> Vec<f64> {
    match spec {
        Some(PointSpec::Explicit(points)) => points,
        other => panic!("expected explicit points, got {other:?}"),
    }
}

#[test]
fn test_equidistant_count_is_used_as_is() {
    let a = attrs(json!({ "numberOfPoints": 5 }));
    for t in DistributionType::ALL {
        assert_eq!(
            resolve_points(t, MAX_POINTS, ROUNDING, &a),
            Some(PointSpec::Equidistant(5))
        );
    }
}

#[test]
fn test_equidistant_count_is_capped() {
    let a = attrs(json!({ "numberOfPoints": 500 }));
    assert_eq!(
        resolve_points(DistributionType::Cdf, 20, ROUNDING, &a),
        Some(PointSpec::Equidistant(20))
    );
}

#[test]
fn test_equidistant_count_wins_over_points() {
    let a = attrs(json!({ "numberOfPoints": 3, "points": [0.5], "start": 0, "end": 1, "increment": 0.5 }));
    assert_eq!(
        resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a),
        Some(PointSpec::Equidistant(3))
    );
}

#[test]
fn test_non_positive_count_falls_through() {
    let a = attrs(json!({ "numberOfPoints": 0, "points": [0.2] }));
    assert_eq!(number_of_equidistant_points(&a), 0);
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a)),
        &[0.2],
    );

    let negative = attrs(json!({ "numberOfPoints": -4 }));
    assert_eq!(number_of_equidistant_points(&negative), 0);
    assert_eq!(
        resolve_points(DistributionType::Pmf, MAX_POINTS, ROUNDING, &negative),
        None
    );
}

#[test]
fn test_explicit_points_are_deduplicated_and_sorted() {
    let a = attrs(json!({ "points": [0.1, 0.5, 0.9, 0.5] }));
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a)),
        &[0.1, 0.5, 0.9],
    );
}

#[test]
fn test_explicit_points_are_truncated_after_sorting() {
    let a = attrs(json!({ "points": [9, 1, 7, 3, 5, 3] }));
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Pmf, 3, ROUNDING, &a)),
        &[1.0, 3.0, 5.0],
    );
}

#[test]
fn test_explicit_points_win_over_range() {
    let a = attrs(json!({ "points": [2.0], "start": 0, "end": 1, "increment": 0.5 }));
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Cdf, MAX_POINTS, ROUNDING, &a)),
        &[2.0],
    );
}

#[test]
fn test_quantile_points_out_of_range_are_rejected() {
    let a = attrs(json!({ "points": [-0.1, 1.5] }));
    assert_eq!(
        resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a),
        None
    );
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Pmf, MAX_POINTS, ROUNDING, &a)),
        &[-0.1, 1.5],
    );
}

#[test]
fn test_non_numeric_points_are_skipped() {
    let a = attrs(json!({ "points": ["a", 0.3, null, true, 0.1] }));
    assert_eq!(provided_points(&a), vec![0.3, 0.1]);
    let none = attrs(json!({ "points": ["a", "b"] }));
    assert!(provided_points(&none).is_empty());
    assert_eq!(
        resolve_points(DistributionType::Cdf, MAX_POINTS, ROUNDING, &none),
        None
    );
}

#[test]
fn test_range_generates_inclusive_points() {
    let a = attrs(json!({ "start": 0, "end": 1, "increment": 0.25 }));
    assert_points_equal(
        &explicit(resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a)),
        &[0.0, 0.25, 0.5, 0.75, 1.0],
    );
}

#[test]
fn test_range_points_are_rounded() {
    let a = attrs(json!({ "start": 0, "end": 1, "increment": 0.1 }));
    let points = generate_points(MAX_POINTS, 2, &a);
    assert_eq!(points.len(), 11);
    assert_eq!(points[3], 0.3);
    assert_eq!(points[7], 0.7);
}

#[test]
fn test_range_over_huge_magnitudes_stays_finite() {
    let a = attrs(json!({ "start": 1e305, "end": 1.5e305, "increment": 1e304 }));
    let points = generate_points(MAX_POINTS, ROUNDING, &a);
    assert!(points.len() >= 5, "{points:?}");
    assert_eq!(points[0], 1e305);
    assert!(points.iter().all(|p| p.is_finite()));
    assert!(!has_invalid_bounds(DistributionType::Cdf, &points));
}

#[test]
fn test_range_stops_at_max_points() {
    let a = attrs(json!({ "start": 10, "end": 1000, "increment": 10 }));
    assert_points_equal(&generate_points(4, ROUNDING, &a), &[10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn test_invalid_ranges_yield_nothing() {
    for bad in [
        json!({ "start": 5, "end": 1, "increment": 1 }),
        json!({ "start": 1, "end": 1, "increment": 1 }),
        json!({ "start": 0, "end": 1, "increment": 0 }),
        json!({ "start": 0, "end": 1, "increment": -0.5 }),
        json!({ "start": 0, "end": 1 }),
        json!({ "start": "0", "end": 1, "increment": 0.5 }),
    ] {
        let a = attrs(bad);
        assert!(generate_points(MAX_POINTS, ROUNDING, &a).is_empty(), "{a:?}");
        assert_eq!(
            resolve_points(DistributionType::Quantile, MAX_POINTS, ROUNDING, &a),
            None
        );
    }
}

#[test]
fn test_clean_points() {
    assert_eq!(clean_points(&[3.0, 1.0, 3.0, 2.0], 10), vec![1.0, 2.0, 3.0]);
    assert_eq!(clean_points(&[3.0, 1.0, 2.0], 2), vec![1.0, 2.0]);
    assert!(clean_points(&[], 5).is_empty());
}

#[test]
fn test_bounds_check() {
    assert!(has_invalid_bounds(DistributionType::Pmf, &[]));
    assert!(has_invalid_bounds(DistributionType::Quantile, &[-0.5, 0.5]));
    assert!(has_invalid_bounds(DistributionType::Quantile, &[0.5, 1.01]));
    assert!(!has_invalid_bounds(DistributionType::Quantile, &[0.0, 1.0]));
    assert!(!has_invalid_bounds(DistributionType::Cdf, &[-100.0, 100.0]));
}
