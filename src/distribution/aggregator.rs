use super::points::{PointSpec, TYPE, resolve_points};
use super::{DistributionTable, DistributionType};
use crate::config::{Aggregation, AggregationConfig};
use crate::record::{Record, extract_field_as_number};
use crate::sketch::QuantileSketch;
use crate::validation::{ValidationError, ValidationResult, format_codes};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

/// Lifecycle of a [`Distribution`]. Finalization consumes the aggregator, so
/// it has no variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet initialized.
    Created,
    /// Initialized successfully; accepts records and merges.
    Ready,
    /// Initialization reported errors; unusable.
    Failed,
}

/// A validated distribution configuration.
///
/// Produced by the same checks [`Distribution::initialize`] runs, and able to
/// mint any number of fresh accumulators that merge with each other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionPlan {
    field: String,
    entries: usize,
    rounding: u32,
    distribution_type: DistributionType,
    points: PointSpec,
}

impl DistributionPlan {
    /// Validate in order, stopping at the first failing step:
    ///
    /// 1. exactly one field, else `REQUIRES_ONE_FIELD`;
    /// 2. non-empty attributes, else `REQUIRES_TYPE`;
    /// 3. a supported `type` name, else `REQUIRES_TYPE`;
    /// 4. usable points, else `REQUIRES_POINTS` (with
    ///    `REQUIRES_POINTS_PROPER_RANGE` as well for `QUANTILE`).
    pub fn validate(
        aggregation: &Aggregation,
        entries: usize,
        rounding: u32,
        max_points: usize,
    ) -> Result<Self, Vec<ValidationError>> {
        let [field] = aggregation.fields.as_slice() else {
            return Err(vec![ValidationError::requires_one_field()]);
        };

        let attributes = match &aggregation.attributes {
            Some(attributes) if !attributes.is_empty() => attributes,
            _ => return Err(vec![ValidationError::requires_type()]),
        };

        let Some(distribution_type) = attributes
            .get(TYPE)
            .and_then(Value::as_str)
            .and_then(DistributionType::from_name)
        else {
            return Err(vec![ValidationError::requires_type()]);
        };

        let Some(points) = resolve_points(distribution_type, max_points, rounding, attributes) else {
            let mut errors = vec![ValidationError::requires_points()];
            if distribution_type == DistributionType::Quantile {
                errors.push(ValidationError::requires_points_proper_range());
            }
            return Err(errors);
        };

        Ok(Self {
            field: field.clone(),
            entries,
            rounding,
            distribution_type,
            points,
        })
    }

    /// Validate `aggregation` under the limits of `config`.
    pub fn from_aggregation(
        aggregation: &Aggregation,
        config: &AggregationConfig,
    ) -> Result<Self, Vec<ValidationError>> {
        Self::validate(
            aggregation,
            config.sketch_entries,
            config.generated_points_rounding,
            max_points(aggregation, config),
        )
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn distribution_type(&self) -> DistributionType {
        self.distribution_type
    }

    #[must_use]
    pub const fn points(&self) -> &PointSpec {
        &self.points
    }

    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// A fresh, empty sketch for this configuration.
    #[must_use]
    pub fn new_sketch(&self) -> QuantileSketch {
        QuantileSketch::from_spec(
            self.entries,
            self.rounding,
            self.distribution_type,
            self.points.clone(),
        )
    }

    /// Feed `record`'s field into `sketch`. Records without a numeric value
    /// are ignored.
    pub fn consume_into(&self, sketch: &mut QuantileSketch, record: &Record) {
        if let Some(value) = extract_field_as_number(&self.field, record) {
            sketch.update(value);
        }
    }
}

/// The point cap of a distribution: the configured cap, further bounded by the
/// query's result size, and never below one.
#[must_use]
pub fn max_points(aggregation: &Aggregation, config: &AggregationConfig) -> usize {
    config
        .max_points
        .min(config.size_for(aggregation.size))
        .max(1)
}

#[derive(Clone, Debug)]
enum State {
    Created,
    Ready {
        plan: DistributionPlan,
        sketch: QuantileSketch,
    },
    Failed,
}

/// Approximate distribution of one numeric field.
///
/// Must be [`initialize`](Self::initialize)d exactly once before records are
/// consumed. [`finish`](Self::finish) consumes the aggregator, so a result is
/// produced at most once.
#[derive(Clone, Debug)]
pub struct Distribution {
    aggregation: Aggregation,
    entries: usize,
    rounding: u32,
    max_points: usize,
    state: State,
}

impl Distribution {
    /// Read the limits from `config`. Nothing is validated yet.
    #[must_use]
    pub fn new(aggregation: &Aggregation, config: &AggregationConfig) -> Self {
        Self {
            aggregation: aggregation.clone(),
            entries: config.sketch_entries,
            rounding: config.generated_points_rounding,
            max_points: max_points(aggregation, config),
            state: State::Created,
        }
    }

    /// Validate the configuration and build the sketch.
    ///
    /// Every error found at the failing step is returned together.
    ///
    /// # Panics
    ///
    /// Panics if called more than once.
    pub fn initialize(&mut self) -> ValidationResult {
        assert!(
            matches!(self.state, State::Created),
            "distribution aggregation initialized twice"
        );
        match DistributionPlan::validate(&self.aggregation, self.entries, self.rounding, self.max_points) {
            Ok(plan) => {
                trace!(
                    field = plan.field(),
                    distribution_type = %plan.distribution_type(),
                    points = ?plan.points(),
                    "distribution aggregation ready"
                );
                let sketch = plan.new_sketch();
                self.state = State::Ready { plan, sketch };
                Ok(())
            }
            Err(errors) => {
                debug!(codes = %format_codes(&errors), "distribution aggregation rejected");
                self.state = State::Failed;
                Err(errors)
            }
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self.state {
            State::Created => Phase::Created,
            State::Ready { .. } => Phase::Ready,
            State::Failed => Phase::Failed,
        }
    }

    /// The field being aggregated, once initialized.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match &self.state {
            State::Ready { plan, .. } => Some(plan.field()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn max_points(&self) -> usize {
        self.max_points
    }

    #[must_use]
    pub fn plan(&self) -> Option<&DistributionPlan> {
        match &self.state {
            State::Ready { plan, .. } => Some(plan),
            _ => None,
        }
    }

    #[must_use]
    pub fn sketch(&self) -> Option<&QuantileSketch> {
        match &self.state {
            State::Ready { sketch, .. } => Some(sketch),
            _ => None,
        }
    }

    /// Feed the field's numeric value into the sketch. Records without one
    /// are ignored, as are calls before a successful initialization.
    pub fn consume(&mut self, record: &Record) {
        let phase = self.phase();
        match &mut self.state {
            State::Ready { plan, sketch } => plan.consume_into(sketch, record),
            State::Created | State::Failed => {
                warn!(?phase, "record ignored by uninitialized distribution");
            }
        }
    }

    /// Combine another partial into this one.
    ///
    /// # Panics
    ///
    /// Panics unless both aggregators are ready with the same configuration.
    pub fn merge(&mut self, other: &Self) {
        let phases = (self.phase(), other.phase());
        match (&mut self.state, &other.state) {
            (State::Ready { plan, sketch }, State::Ready { plan: other_plan, sketch: other_sketch }) => {
                assert_eq!(&*plan, other_plan, "cannot merge differently configured distributions");
                sketch.merge(other_sketch);
            }
            _ => panic!(
                "cannot merge {:?} distribution with {:?} distribution",
                phases.1, phases.0
            ),
        }
    }

    /// Render the output table, or `None` if the aggregator never became ready.
    #[must_use]
    pub fn finish(self) -> Option<DistributionTable> {
        match self.state {
            State::Ready { sketch, .. } => Some(sketch.result()),
            State::Created | State::Failed => None,
        }
    }
}
