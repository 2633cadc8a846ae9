use super::CombineFn;
use crate::config::{Aggregation, AggregationConfig};
use crate::distribution::{DistributionPlan, DistributionTable};
use crate::record::Record;
use crate::sketch::QuantileSketch;
use crate::validation::ValidationError;

/// Approximate distribution of one field.
///
/// - Accumulator: [`QuantileSketch`]
/// - Output: [`DistributionTable`]
#[derive(Clone, Debug)]
pub struct DistributionCombiner {
    plan: DistributionPlan,
}

impl DistributionCombiner {
    #[must_use]
    pub const fn new(plan: DistributionPlan) -> Self {
        Self { plan }
    }

    /// Validate `aggregation` and build a combiner for it.
    pub fn from_aggregation(
        aggregation: &Aggregation,
        config: &AggregationConfig,
    ) -> Result<Self, Vec<ValidationError>> {
        DistributionPlan::from_aggregation(aggregation, config).map(Self::new)
    }

    #[must_use]
    pub const fn plan(&self) -> &DistributionPlan {
        &self.plan
    }
}

impl CombineFn<Record, QuantileSketch, DistributionTable> for DistributionCombiner {
    fn create(&self) -> QuantileSketch {
        self.plan.new_sketch()
    }

    fn add_input(&self, acc: &mut QuantileSketch, v: Record) {
        self.plan.consume_into(acc, &v);
    }

    fn merge(&self, acc: &mut QuantileSketch, other: QuantileSketch) {
        acc.merge(&other);
    }

    fn finish(&self, acc: QuantileSketch) -> DistributionTable {
        acc.result()
    }
}
