//! Prebuilt record sets.

use crate::record::Record;
use serde_json::json;

/// Request log records with a `service` and `region` dimension and a
/// `latency` measurement. Two records lack `latency` and one holds it as a
/// string.
///
/// # Example
///
/// ```
/// use tallybeam::testing::request_log;
///
/// let records = request_log();
/// assert!(records.iter().any(|r| r.field_as_number("latency").is_none()));
/// ```
#[must_use]
pub fn request_log() -> Vec<Record> {
    let rows = [
        ("api", "us", json!(120)),
        ("api", "us", json!(80)),
        ("api", "eu", json!(200)),
        ("web", "us", json!(35.5)),
        ("web", "eu", json!(40)),
        ("web", "eu", json!(null)),
        ("db", "us", json!(5)),
        ("db", "us", json!("slow")),
        ("api", "eu", json!(150)),
    ];
    let mut records: Vec<Record> = rows
        .into_iter()
        .map(|(service, region, latency)| {
            Record::new()
                .with("service", json!(service))
                .with("region", json!(region))
                .with("latency", latency)
        })
        .collect();
    records.push(Record::new().with("service", json!("web")).with("region", json!("us")));
    records
}

/// Values 1 through 20 with two outliers (150 and -50).
#[must_use]
pub fn numeric_data_with_outliers() -> Vec<f64> {
    let mut data: Vec<f64> = (1..=20).map(f64::from).collect();
    data.insert(10, 150.0);
    data.push(-50.0);
    data
}
