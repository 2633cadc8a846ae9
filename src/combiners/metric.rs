use super::CombineFn;
use crate::metric::{MetricKind, MetricValue};

/// One metric over a stream of numbers.
///
/// - Accumulator: [`MetricValue`]
/// - Output: `Option<f64>`, `None` for an empty `MIN`, `MAX` or `AVG`.
#[derive(Clone, Copy, Debug)]
pub struct MetricCombiner {
    kind: MetricKind,
}

impl MetricCombiner {
    #[must_use]
    pub const fn new(kind: MetricKind) -> Self {
        Self { kind }
    }
}

impl CombineFn<f64, MetricValue, Option<f64>> for MetricCombiner {
    fn create(&self) -> MetricValue {
        MetricValue::neutral(self.kind)
    }

    fn add_input(&self, acc: &mut MetricValue, v: f64) {
        acc.update(v);
    }

    fn merge(&self, acc: &mut MetricValue, other: MetricValue) {
        acc.merge(&other);
    }

    fn finish(&self, acc: MetricValue) -> Option<f64> {
        acc.value()
    }
}
