//! Group metrics: what is tracked per group and how running values combine.
//!
//! A [`Metric`] is a stateless definition (statistic kind, optional source
//! field, optional output alias). Its running value is a [`MetricValue`],
//! owned by the group state that tracks it.
//!
//! Every `MetricValue` is mergeable: merging is commutative and associative,
//! so partial values computed on different workers can be reduced in any
//! order. Averages are kept as `(sum, count)` and only divided when read.
//! SUM and AVG of fractional values are exact only up to f64 summation
//! order, so differently split partials may differ in the last bits.
//!
//! # Example
//!
//! ```
//! use tallybeam::metric::{Metric, MetricKind, MetricValue};
//!
//! let avg = Metric::new(MetricKind::Avg, Some("price"));
//! let mut left = MetricValue::neutral(avg.kind);
//! let mut right = MetricValue::neutral(avg.kind);
//! left.update(1.0);
//! right.update(2.0);
//! right.update(6.0);
//! left.merge(&right);
//! assert_eq!(left.value(), Some(3.0));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// The statistic a metric computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricKind {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl MetricKind {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Avg => "AVG",
        }
    }

    /// Whether this kind reads a source field.
    #[must_use]
    pub const fn needs_field(self) -> bool {
        !matches!(self, Self::Count)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A metric definition. Identity is the full `(kind, field, alias)` triple.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Metric {
    /// A metric over an optional source field.
    pub fn new<S: Into<String>>(kind: MetricKind, field: Option<S>) -> Self {
        Self {
            kind,
            field: field.map(Into::into),
            alias: None,
        }
    }

    /// `COUNT` of records.
    #[must_use]
    pub fn count() -> Self {
        Self::new::<String>(MetricKind::Count, None)
    }

    #[must_use]
    pub fn sum(field: &str) -> Self {
        Self::new(MetricKind::Sum, Some(field))
    }

    #[must_use]
    pub fn min(field: &str) -> Self {
        Self::new(MetricKind::Min, Some(field))
    }

    #[must_use]
    pub fn max(field: &str) -> Self {
        Self::new(MetricKind::Max, Some(field))
    }

    #[must_use]
    pub fn avg(field: &str) -> Self {
        Self::new(MetricKind::Avg, Some(field))
    }

    /// Name the output column.
    #[must_use]
    pub fn with_alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The column name used when the group is rendered as a record.
    #[must_use]
    pub fn output_name(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match &self.field {
            Some(field) => format!("{}({field})", self.kind),
            None => self.kind.to_string(),
        }
    }
}

/// Running value of one metric within one group.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Count(u64),
    Sum(f64),
    Min(f64),
    Max(f64),
    Avg { sum: f64, count: u64 },
}

impl MetricValue {
    /// The identity element of `kind`'s merge rule.
    #[must_use]
    pub const fn neutral(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Count => Self::Count(0),
            MetricKind::Sum => Self::Sum(0.0),
            MetricKind::Min => Self::Min(f64::INFINITY),
            MetricKind::Max => Self::Max(f64::NEG_INFINITY),
            MetricKind::Avg => Self::Avg { sum: 0.0, count: 0 },
        }
    }

    /// The kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::Count(_) => MetricKind::Count,
            Self::Sum(_) => MetricKind::Sum,
            Self::Min(_) => MetricKind::Min,
            Self::Max(_) => MetricKind::Max,
            Self::Avg { .. } => MetricKind::Avg,
        }
    }

    /// Fold one observed record into the value. `Count` ignores `v`.
    pub fn update(&mut self, v: f64) {
        match self {
            Self::Count(c) => *c += 1,
            Self::Sum(s) => *s += v,
            Self::Min(m) => *m = m.min(v),
            Self::Max(m) => *m = m.max(v),
            Self::Avg { sum, count } => {
                *sum += v;
                *count += 1;
            }
        }
    }

    /// Combine another partial value of the same kind into this one.
    ///
    /// # Panics
    ///
    /// Panics if `other` is a different kind.
    pub fn merge(&mut self, other: &Self) {
        match (self, other) {
            (Self::Count(a), Self::Count(b)) => *a += b,
            (Self::Sum(a), Self::Sum(b)) => *a += b,
            (Self::Min(a), Self::Min(b)) => *a = a.min(*b),
            (Self::Max(a), Self::Max(b)) => *a = a.max(*b),
            (Self::Avg { sum: s1, count: c1 }, Self::Avg { sum: s2, count: c2 }) => {
                *s1 += s2;
                *c1 += c2;
            }
            (a, b) => panic!("cannot merge {} into {}", b.kind(), a.kind()),
        }
    }

    /// The readable value, or `None` while nothing has been observed for
    /// `MIN`, `MAX` and `AVG`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Count(c) => Some(c as f64),
            Self::Sum(s) => Some(s),
            Self::Min(m) if m == f64::INFINITY => None,
            Self::Max(m) if m == f64::NEG_INFINITY => None,
            Self::Min(m) | Self::Max(m) => Some(m),
            Self::Avg { count: 0, .. } => None,
            Self::Avg { sum, count } => Some(sum / count as f64),
        }
    }
}
