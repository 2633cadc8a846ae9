//! A partition-local map of groups, fed by an external record router.

use super::cached::CachedGroupState;
use super::state::{GroupKey, GroupState};
use crate::metric::Metric;
use crate::record::Record;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::trace;

/// All groups observed by one partition.
///
/// New groups are created from a container state that holds neutral metric
/// values: the container is pointed at the incoming group key and
/// [`partial_copy`](CachedGroupState::partial_copy)'d, so the key produced by
/// the router is stored without another copy. One record routed to several
/// groups is shared through a single `Arc`.
#[derive(Clone, Debug)]
pub struct GroupSummary {
    container: CachedGroupState,
    groups: HashMap<Arc<GroupKey>, CachedGroupState>,
    max_groups: Option<usize>,
}

impl GroupSummary {
    pub fn new(metrics: &[Metric]) -> Self {
        Self {
            container: CachedGroupState::new(GroupState::ungrouped(metrics)),
            groups: HashMap::new(),
            max_groups: None,
        }
    }

    /// Limit the number of groups emitted by [`into_records`](Self::into_records).
    ///
    /// The limit is applied after sorting by group key, so the emitted groups
    /// do not depend on the order partials were merged in.
    #[must_use]
    pub const fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    /// Update every group in `keys` with `record`.
    pub fn update<I>(&mut self, record: Arc<Record>, keys: I)
    where
        I: IntoIterator<Item = GroupKey>,
    {
        self.container.set_cached_record(Some(record));
        for key in keys {
            self.container.set_group_key(Arc::new(key));
            self.update_cached();
        }
        self.container.set_cached_record(None);
    }

    fn update_cached(&mut self) {
        let Some(record) = self.container.cached_record().cloned() else {
            return;
        };
        match self.groups.entry(Arc::clone(self.container.group_key_handle())) {
            Entry::Occupied(mut e) => e.get_mut().consume(&record),
            Entry::Vacant(v) => {
                trace!(group = ?v.key(), "new group");
                let mut group = self.container.partial_copy();
                group.consume(&record);
                v.insert(group);
            }
        }
    }

    /// Combine another partition's groups into this one.
    pub fn merge(&mut self, other: Self) {
        for (key, group) in other.groups {
            match self.groups.entry(key) {
                Entry::Occupied(mut e) => e.get_mut().merge(&group),
                Entry::Vacant(v) => {
                    v.insert(group);
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&CachedGroupState> {
        self.groups.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One record per group, ordered by group key and capped at the group limit.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        let mut groups: Vec<_> = self.groups.into_values().collect();
        groups.sort_by(|a, b| a.group_key().cmp(b.group_key()));
        let limit = self.max_groups.unwrap_or(usize::MAX);
        groups.iter().take(limit).map(|g| g.as_record()).collect()
    }
}
