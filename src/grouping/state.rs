//! Per-group mutable state: the group key plus one running value per metric.

use crate::metric::{Metric, MetricKind, MetricValue};
use crate::record::Record;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Dimension field name to its rendered value for one group.
pub type GroupKey = BTreeMap<String, String>;

/// Running state of a single group.
///
/// The group key is fixed at construction and shared read-only (`Arc`); the
/// metric map is exclusively owned and mutated by [`consume`](Self::consume)
/// and [`merge`](Self::merge). The set of metrics is fixed at construction and
/// must be identical between any two states that are merged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupState {
    pub(crate) group_key: Arc<GroupKey>,
    #[serde(with = "metric_entries")]
    pub(crate) metrics: BTreeMap<Metric, MetricValue>,
}

impl GroupState {
    /// Create a state for `group_key` with every metric at its neutral value.
    pub fn new(group_key: Arc<GroupKey>, metrics: &[Metric]) -> Self {
        Self {
            group_key,
            metrics: initial_metrics(metrics),
        }
    }

    /// A state for the single implicit group of an ungrouped aggregation.
    #[must_use]
    pub fn ungrouped(metrics: &[Metric]) -> Self {
        Self::new(Arc::new(GroupKey::new()), metrics)
    }

    /// Render the values of `fields` from `record` into a group key.
    #[must_use]
    pub fn key_from_record(fields: &[String], record: &Record) -> GroupKey {
        fields
            .iter()
            .map(|f| (f.clone(), record.field_as_string(f)))
            .collect()
    }

    #[must_use]
    pub fn group_key(&self) -> &GroupKey {
        &self.group_key
    }

    /// The shared handle to the group key.
    #[must_use]
    pub fn group_key_handle(&self) -> &Arc<GroupKey> {
        &self.group_key
    }

    /// The metrics tracked by this group, in a stable order.
    pub fn metrics(&self) -> impl Iterator<Item = (&Metric, &MetricValue)> {
        self.metrics.iter()
    }

    /// Current readable value of `metric`, if tracked and non-empty.
    #[must_use]
    pub fn metric_value(&self, metric: &Metric) -> Option<f64> {
        self.metrics.get(metric).and_then(MetricValue::value)
    }

    /// Update every metric from one record.
    ///
    /// `COUNT` always increments. Other metrics read their field and skip
    /// this record when the field is missing or not numeric, without
    /// affecting the remaining metrics.
    pub fn consume(&mut self, record: &Record) {
        for (metric, value) in &mut self.metrics {
            if metric.kind == MetricKind::Count {
                value.update(1.0);
                continue;
            }
            let Some(field) = metric.field.as_deref() else {
                continue;
            };
            if let Some(v) = record.field_as_number(field) {
                value.update(v);
            }
        }
    }

    /// Combine another partial state for the same group into this one.
    ///
    /// # Panics
    ///
    /// Panics if `other` tracks a different set of metrics.
    pub fn merge(&mut self, other: &Self) {
        assert!(
            self.metrics.len() == other.metrics.len()
                && self.metrics.keys().eq(other.metrics.keys()),
            "cannot merge group states with different metrics: {:?} vs {:?}",
            self.metrics.keys().collect::<Vec<_>>(),
            other.metrics.keys().collect::<Vec<_>>()
        );
        debug_assert_eq!(self.group_key, other.group_key, "merging different groups");
        for (mine, theirs) in self.metrics.values_mut().zip(other.metrics.values()) {
            mine.merge(theirs);
        }
    }

    /// Render the group as a record: the group fields, then each metric under
    /// its output name. Metrics with nothing observed render as `null`.
    #[must_use]
    pub fn as_record(&self) -> Record {
        let mut record = Record::new();
        for (field, value) in self.group_key.iter() {
            record.set(field.clone(), Value::String(value.clone()));
        }
        for (metric, value) in &self.metrics {
            let rendered = match (value, value.value()) {
                (MetricValue::Count(c), _) => Value::from(*c),
                (_, Some(v)) => Value::from(v),
                (_, None) => Value::Null,
            };
            record.set(metric.output_name(), rendered);
        }
        record
    }
}

pub(crate) fn initial_metrics(metrics: &[Metric]) -> BTreeMap<Metric, MetricValue> {
    metrics
        .iter()
        .map(|m| (m.clone(), MetricValue::neutral(m.kind)))
        .collect()
}

/// Metric maps have struct keys, so they travel as a list of pairs.
mod metric_entries {
    use super::{BTreeMap, Deserialize, Deserializer, Metric, MetricValue, Serializer};

    pub fn serialize<S: Serializer>(
        metrics: &BTreeMap<Metric, MetricValue>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.collect_seq(metrics.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<Metric, MetricValue>, D::Error> {
        Vec::<(Metric, MetricValue)>::deserialize(d).map(|pairs| pairs.into_iter().collect())
    }
}
