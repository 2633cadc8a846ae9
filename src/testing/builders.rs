//! Test data builders for creating record sets fluently.

use crate::record::Record;
use serde_json::{Value, json};

/// A fluent builder for test records.
///
/// # Example
///
/// ```
/// use tallybeam::testing::TestRecords;
///
/// let records = TestRecords::new()
///     .add_numbers("latency", &[1.0, 2.0])
///     .add_keyed("service", "api", "latency", &[5.0])
///     .add_missing(3)
///     .build();
///
/// assert_eq!(records.len(), 6);
/// ```
#[derive(Default)]
pub struct TestRecords {
    records: Vec<Record>,
}

impl TestRecords {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Add a single record.
    #[must_use]
    pub fn add_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Add one record per value, holding `field: value`.
    #[must_use]
    pub fn add_numbers(mut self, field: &str, values: &[f64]) -> Self {
        self.records
            .extend(values.iter().map(|&v| Record::new().with(field, json!(v))));
        self
    }

    /// Add one record per value, holding `key_field: key` and `field: value`.
    #[must_use]
    pub fn add_keyed(mut self, key_field: &str, key: &str, field: &str, values: &[f64]) -> Self {
        self.records.extend(values.iter().map(|&v| {
            Record::new()
                .with(key_field, json!(key))
                .with(field, json!(v))
        }));
        self
    }

    /// Add `count` records that only hold an unrelated field.
    #[must_use]
    pub fn add_missing(mut self, count: usize) -> Self {
        self.records
            .extend((0..count).map(|i| Record::new().with("unrelated", json!(i))));
        self
    }

    /// Add `count` copies of `field: value`, whatever the value's JSON type.
    #[must_use]
    pub fn add_repeated(mut self, field: &str, value: &Value, count: usize) -> Self {
        self.records
            .extend((0..count).map(|_| Record::new().with(field, value.clone())));
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<Record> {
        self.records
    }
}

/// Deterministic pseudo-random values in `[min, max)` from a fixed-seed LCG.
///
/// # Example
///
/// ```
/// use tallybeam::testing::pseudo_random_values;
///
/// let data = pseudo_random_values(10, 0.0, 100.0);
/// assert_eq!(data.len(), 10);
/// assert!(data.iter().all(|&v| (0.0..100.0).contains(&v)));
/// ```
#[must_use]
pub fn pseudo_random_values(count: usize, min: f64, max: f64) -> Vec<f64> {
    let mut seed: u32 = 12345;
    (0..count)
        .map(|_| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let unit = f64::from(seed >> 8) / f64::from(1u32 << 24);
            unit.mul_add(max - min, min)
        })
        .collect()
}
