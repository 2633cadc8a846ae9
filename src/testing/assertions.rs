//! Assertion functions for aggregation outputs.

use crate::record::Record;
use crate::validation::{ErrorCode, ValidationError};

/// Tolerance used by [`assert_points_equal`] and [`assert_metric`].
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Assert that `actual` is within `tolerance` of `expected`.
///
/// # Panics
///
/// Panics if the values differ by more than `tolerance`, or if exactly one
/// of them is NaN.
///
/// # Example
///
/// ```
/// use tallybeam::testing::assert_close;
///
/// assert_close(0.1 + 0.2, 0.3, 1e-12);
/// ```
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    if actual.is_nan() && expected.is_nan() {
        return;
    }
    assert!(
        (actual - expected).abs() <= tolerance,
        "Value mismatch:\n  Expected: {expected}\n  Actual: {actual}\n  Tolerance: {tolerance}"
    );
}

/// Assert that two point lists match element by element.
///
/// # Panics
///
/// Panics if the lists differ in length or any pair differs by more than
/// [`DEFAULT_TOLERANCE`].
///
/// # Example
///
/// ```
/// use tallybeam::testing::assert_points_equal;
///
/// assert_points_equal(&[0.0, 0.25, 0.5], &[0.0, 0.25, 0.5]);
/// ```
pub fn assert_points_equal(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Point count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= DEFAULT_TOLERANCE,
            "Point mismatch at index {i}:\n  Expected: {e}\n  Actual: {a}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert the numeric value of one output column. `None` expects the column
/// to be null or absent.
///
/// # Panics
///
/// Panics if the column does not hold the expected value.
pub fn assert_metric(record: &Record, column: &str, expected: Option<f64>) {
    let actual = record.field_as_number(column);
    match (actual, expected) {
        (Some(a), Some(e)) => assert!(
            (a - e).abs() <= DEFAULT_TOLERANCE,
            "Column {column} mismatch:\n  Expected: {e}\n  Actual: {a}\n  Record: {record:?}"
        ),
        (None, None) => {}
        _ => panic!("Column {column} mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}\n  Record: {record:?}"),
    }
}

/// Assert the codes of a validation failure, in order.
///
/// # Panics
///
/// Panics if the codes differ.
pub fn assert_error_codes(errors: &[ValidationError], expected: &[ErrorCode]) {
    let actual: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
    assert_eq!(
        actual, expected,
        "Error code mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}\n  Errors: {errors:?}"
    );
}
