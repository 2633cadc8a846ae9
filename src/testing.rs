//! Testing utilities for tallybeam aggregations.
//!
//! Helpers for writing tests against metrics, groups and distributions:
//!
//! - **Assertions**: float comparisons with tolerance, point lists, error codes
//! - **Test data builders**: generate records fluently
//! - **Fixtures**: small prebuilt record sets for common scenarios
//!
//! # Quick Start
//!
//! ```
//! use tallybeam::combiners::GroupAll;
//! use tallybeam::metric::Metric;
//! use tallybeam::runner::Runner;
//! use tallybeam::testing::*;
//!
//! let records = TestRecords::new()
//!     .add_numbers("x", &[1.0, 2.0, 3.0])
//!     .add_missing(2)
//!     .build();
//!
//! let out = Runner::sequential().combine(&GroupAll::new(vec![Metric::avg("x")]), records)?;
//! assert_metric(&out, "AVG(x)", Some(2.0));
//! # anyhow::Result::<()>::Ok(())
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
