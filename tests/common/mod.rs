#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Once;
use tallybeam::config::{Aggregation, Attributes};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Attributes from a JSON object literal.
pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("attributes must be an object, got {other}"),
    }
}

/// A one-field distribution aggregation of `type` with extra `attributes`.
pub fn distribution(field: &str, distribution_type: &str, attributes: Value) -> Aggregation {
    let mut map = attrs(attributes);
    map.insert("type".to_string(), json!(distribution_type));
    Aggregation {
        fields: vec![field.to_string()],
        size: None,
        attributes: Some(map),
    }
}
