//! Small numeric helpers shared by point generation and sketch output.

/// Round `value` to `places` decimal places (half away from zero).
///
/// Non-finite inputs, and values too large to scale, are returned unchanged.
///
/// # Examples
///
/// ```
/// use tallybeam::utils::round;
///
/// assert_eq!(round(0.1234567, 6), 0.123457);
/// assert_eq!(round(2.5, 0), 3.0);
/// ```
#[must_use]
pub fn round(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places.min(15) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::round;

    #[test]
    fn rounds_accumulated_float_error() {
        assert_eq!(round(0.1 + 0.2, 6), 0.3);
        assert_eq!(round(0.75000000001, 6), 0.75);
        assert_eq!(round(-1.23456, 2), -1.23);
    }

    #[test]
    fn keeps_non_finite() {
        assert!(round(f64::NAN, 3).is_nan());
        assert_eq!(round(f64::INFINITY, 3), f64::INFINITY);
    }

    #[test]
    fn keeps_values_too_large_to_scale() {
        assert_eq!(round(1e305, 6), 1e305);
        assert_eq!(round(-f64::MAX, 2), -f64::MAX);
    }
}
