use super::CombineFn;
use crate::grouping::{GroupKey, GroupState, GroupSummary};
use crate::metric::Metric;
use crate::record::Record;
use std::sync::Arc;

/// Metrics over every record, treated as a single group.
///
/// - Accumulator: [`GroupState`] with an empty group key
/// - Output: one [`Record`] with a column per metric
#[derive(Clone, Debug)]
pub struct GroupAll {
    metrics: Vec<Metric>,
}

impl GroupAll {
    #[must_use]
    pub const fn new(metrics: Vec<Metric>) -> Self {
        Self { metrics }
    }
}

impl CombineFn<Record, GroupState, Record> for GroupAll {
    fn create(&self) -> GroupState {
        GroupState::ungrouped(&self.metrics)
    }

    fn add_input(&self, acc: &mut GroupState, v: Record) {
        acc.consume(&v);
    }

    fn merge(&self, acc: &mut GroupState, other: GroupState) {
        acc.merge(&other);
    }

    fn finish(&self, acc: GroupState) -> Record {
        acc.as_record()
    }
}

/// Metrics per group. `router` maps a record to every group it belongs to;
/// returning no keys drops the record.
///
/// - Accumulator: [`GroupSummary`]
/// - Output: one [`Record`] per group, ordered by group key
#[derive(Clone)]
pub struct GroupBy<F> {
    metrics: Vec<Metric>,
    router: F,
    max_groups: Option<usize>,
}

impl<F> GroupBy<F>
where
    F: Fn(&Record) -> Vec<GroupKey> + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(metrics: Vec<Metric>, router: F) -> Self {
        Self {
            metrics,
            router,
            max_groups: None,
        }
    }

    /// Emit at most `max_groups` groups.
    #[must_use]
    pub const fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }
}

/// A [`GroupBy`] keyed on the values of `fields`, one group per record.
#[must_use]
pub fn group_by_fields(
    metrics: Vec<Metric>,
    fields: Vec<String>,
) -> GroupBy<impl Fn(&Record) -> Vec<GroupKey> + Send + Sync + 'static> {
    GroupBy::new(metrics, move |record: &Record| {
        vec![GroupState::key_from_record(&fields, record)]
    })
}

impl<F> CombineFn<Record, GroupSummary, Vec<Record>> for GroupBy<F>
where
    F: Fn(&Record) -> Vec<GroupKey> + Send + Sync + 'static,
{
    fn create(&self) -> GroupSummary {
        let summary = GroupSummary::new(&self.metrics);
        match self.max_groups {
            Some(max) => summary.with_max_groups(max),
            None => summary,
        }
    }

    fn add_input(&self, acc: &mut GroupSummary, v: Record) {
        let keys = (self.router)(&v);
        acc.update(Arc::new(v), keys);
    }

    fn merge(&self, acc: &mut GroupSummary, other: GroupSummary) {
        acc.merge(other);
    }

    fn finish(&self, acc: GroupSummary) -> Vec<Record> {
        acc.into_records()
    }
}
