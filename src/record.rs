//! The record model consumed by group states and distribution aggregators.
//!
//! Records are JSON objects. Field extraction never fails: a missing field, a
//! `null`, or a value of the wrong type yields `None`, and the caller skips
//! that record for the affected metric.
//!
//! Field names may be dotted paths (`"stats.latency"`) that descend into nested
//! objects. A literal top-level key that contains a dot takes precedence over
//! the path walk.
//!
//! # Example
//!
//! ```
//! use tallybeam::record::{Record, extract_field_as_number};
//! use serde_json::json;
//!
//! let r = Record::new()
//!     .with("price", json!(12.5))
//!     .with("stats", json!({ "latency": 40 }))
//!     .with("name", json!("widget"));
//!
//! assert_eq!(extract_field_as_number("price", &r), Some(12.5));
//! assert_eq!(extract_field_as_number("stats.latency", &r), Some(40.0));
//! assert_eq!(extract_field_as_number("name", &r), None);
//! assert_eq!(extract_field_as_number("missing", &r), None);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rendering used for group key values that are absent or `null`.
pub const NULL_RENDERING: &str = "null";

/// A single data record: a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<S: Into<String>>(mut self, field: S, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    /// Insert or replace a top-level field.
    pub fn set<S: Into<String>>(&mut self, field: S, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Look up a field by name or dotted path.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(v) = self.0.get(field) {
            return Some(v);
        }
        let mut parts = field.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// The field's value as a number, or `None` if it is missing or not numeric.
    #[must_use]
    pub fn field_as_number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// The field's value rendered as a string for use in a group key.
    ///
    /// Strings render without quotes, missing fields and `null` render as
    /// [`NULL_RENDERING`], everything else uses its JSON text.
    #[must_use]
    pub fn field_as_string(&self, field: &str) -> String {
        match self.get(field) {
            None | Some(Value::Null) => NULL_RENDERING.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over top-level fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consume the record, returning the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> anyhow::Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => anyhow::bail!("record must be a JSON object, got {other}"),
        }
    }
}

/// Free-function form of [`Record::field_as_number`].
#[must_use]
pub fn extract_field_as_number(field: &str, record: &Record) -> Option<f64> {
    record.field_as_number(field)
}
