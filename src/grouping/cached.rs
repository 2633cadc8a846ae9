//! A group state that carries a transient record hint and copies cheaply.

use super::state::{GroupKey, GroupState};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// [`GroupState`] plus a reference to the most recently seen record.
///
/// The cached record is a short-lived hint used while one record fans out to
/// several groups. It is never serialized and takes no part in equality or
/// merging.
///
/// [`partial_copy`](Self::partial_copy) shares the group key and copies only
/// the metric values, so a template state can seed many groups without
/// re-deriving or re-copying the key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedGroupState {
    state: GroupState,
    #[serde(skip)]
    cached_record: Option<Arc<Record>>,
}

impl CachedGroupState {
    /// Wrap an existing state. Nothing is copied.
    #[must_use]
    pub const fn new(state: GroupState) -> Self {
        Self {
            state,
            cached_record: None,
        }
    }

    /// A new state aliasing this group key, with its own copy of the metrics.
    #[must_use]
    pub fn partial_copy(&self) -> Self {
        Self::new(GroupState {
            group_key: Arc::clone(&self.state.group_key),
            metrics: self.state.metrics.clone(),
        })
    }

    /// A fully independent copy of `other`, or `None` if `other` is `None`.
    #[must_use]
    pub fn copy(other: Option<&GroupState>) -> Option<Self> {
        other.map(|state| {
            Self::new(GroupState {
                group_key: Arc::new(GroupKey::clone(&state.group_key)),
                metrics: state.metrics.clone(),
            })
        })
    }

    #[must_use]
    pub fn cached_record(&self) -> Option<&Arc<Record>> {
        self.cached_record.as_ref()
    }

    pub fn set_cached_record(&mut self, record: Option<Arc<Record>>) {
        self.cached_record = record;
    }

    /// Point this state at a different (shared) group key.
    pub fn set_group_key(&mut self, group_key: Arc<GroupKey>) {
        self.state.group_key = group_key;
    }

    /// Unwrap into the plain state, dropping the cached record.
    #[must_use]
    pub fn into_state(self) -> GroupState {
        self.state
    }
}

impl From<GroupState> for CachedGroupState {
    fn from(state: GroupState) -> Self {
        Self::new(state)
    }
}

impl PartialEq for CachedGroupState {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Deref for CachedGroupState {
    type Target = GroupState;

    fn deref(&self) -> &GroupState {
        &self.state
    }
}

impl DerefMut for CachedGroupState {
    fn deref_mut(&mut self) -> &mut GroupState {
        &mut self.state
    }
}
