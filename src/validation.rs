//! Configuration validation errors.
//!
//! Validation never stops at the first problem: an initializer returns every
//! error it found as a [`ValidationResult`] so the caller can report all the
//! fixes at once. Each [`ValidationError`] pairs a message with a resolution
//! hint and carries an [`ErrorCode`] for programmatic matching.
//!
//! # Example
//!
//! ```
//! use tallybeam::validation::{ErrorCode, ValidationError, ValidationResult};
//!
//! fn check(fields: &[&str]) -> ValidationResult {
//!     if fields.len() == 1 {
//!         Ok(())
//!     } else {
//!         Err(vec![ValidationError::requires_one_field()])
//!     }
//! }
//!
//! let errors = check(&[]).unwrap_err();
//! assert_eq!(errors[0].code, ErrorCode::RequiresOneField);
//! ```

use crate::distribution::DistributionType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for validation operations.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Canonical identity of a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    RequiresOneField,
    RequiresType,
    RequiresPoints,
    RequiresPointsProperRange,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiresOneField => "REQUIRES_ONE_FIELD",
            Self::RequiresType => "REQUIRES_TYPE",
            Self::RequiresPoints => "REQUIRES_POINTS",
            Self::RequiresPointsProperRange => "REQUIRES_POINTS_PROPER_RANGE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation error with a resolution hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    /// What is wrong.
    pub message: String,
    /// How to fix it.
    pub resolution: String,
}

impl ValidationError {
    pub fn new<M: Into<String>, R: Into<String>>(code: ErrorCode, message: M, resolution: R) -> Self {
        Self {
            code,
            message: message.into(),
            resolution: resolution.into(),
        }
    }

    #[must_use]
    pub fn requires_one_field() -> Self {
        Self::new(
            ErrorCode::RequiresOneField,
            "The aggregation type requires exactly one field",
            "Please add exactly one field to fields",
        )
    }

    #[must_use]
    pub fn requires_type() -> Self {
        let names: Vec<&str> = DistributionType::ALL.iter().map(|t| t.name()).collect();
        Self::new(
            ErrorCode::RequiresType,
            "The DISTRIBUTION type requires specifying a type",
            format!("Please set type to one of: {}", names.join(", ")),
        )
    }

    #[must_use]
    pub fn requires_points() -> Self {
        Self::new(
            ErrorCode::RequiresPoints,
            "The DISTRIBUTION type requires at least one point specified in attributes",
            "Please add a list of numeric points with points, OR specify a number of equidistant \
             points to generate with numberOfPoints OR specify a range to generate points for \
             with start, end and increment (start < end, increment > 0)",
        )
    }

    #[must_use]
    pub fn requires_points_proper_range() -> Self {
        Self::new(
            ErrorCode::RequiresPointsProperRange,
            format!("{} requires points in the proper range", DistributionType::Quantile.name()),
            "Please add or generate points: 0 <= point <= 1",
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.message, self.code, self.resolution)
    }
}

impl std::error::Error for ValidationError {}

/// Codes of `errors`, comma separated, for log lines.
#[must_use]
pub fn format_codes(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Export errors to JSON for the reporting layer.
pub fn errors_to_json(errors: &[ValidationError]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(errors)
}
