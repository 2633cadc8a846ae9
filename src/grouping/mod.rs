//! Group aggregation state.
//!
//! - [`GroupState`] -- group key plus running metric values, with `consume`
//!   and `merge`.
//! - [`CachedGroupState`] -- a `GroupState` with a transient record hint and
//!   a cheap partial copy that shares the group key.
//! - [`GroupSummary`] -- the groups seen by one partition, keyed by group key.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tallybeam::grouping::{CachedGroupState, GroupKey, GroupState};
//! use tallybeam::metric::Metric;
//! use tallybeam::record::Record;
//!
//! let metrics = [Metric::count(), Metric::sum("bytes")];
//! let key: GroupKey = [("host".to_string(), "a".to_string())].into();
//! let template = CachedGroupState::new(GroupState::new(Arc::new(key), &metrics));
//!
//! let mut left = template.partial_copy();
//! let mut right = template.partial_copy();
//! left.consume(&Record::new().with("bytes", json!(10)));
//! right.consume(&Record::new().with("bytes", json!(5)));
//! left.merge(&right);
//!
//! assert_eq!(left.metric_value(&Metric::count()), Some(2.0));
//! assert_eq!(left.metric_value(&Metric::sum("bytes")), Some(15.0));
//! assert_eq!(template.metric_value(&Metric::count()), Some(0.0));
//! ```

mod cached;
mod state;
mod summary;

pub use cached::CachedGroupState;
pub use state::{GroupKey, GroupState};
pub use summary::GroupSummary;
