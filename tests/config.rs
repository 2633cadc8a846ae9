use anyhow::Result;
use serde_json::json;
use std::io::Write;
use tallybeam::config::{Aggregation, AggregationConfig};
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let cfg = AggregationConfig::default();
    assert_eq!(cfg.sketch_entries, 1024);
    assert_eq!(cfg.max_points, 100);
    assert_eq!(cfg.generated_points_rounding, 6);
    assert_eq!(cfg.default_size, 500);
    assert_eq!(cfg.max_size, 500);
}

#[test]
fn test_partial_json_keeps_defaults() -> Result<()> {
    let cfg = AggregationConfig::from_json_str(r#"{ "max_points": 10, "generated_points_rounding": 2 }"#)?;
    assert_eq!(cfg.max_points, 10);
    assert_eq!(cfg.generated_points_rounding, 2);
    assert_eq!(cfg.sketch_entries, AggregationConfig::DEFAULT_ENTRIES);

    assert_eq!(AggregationConfig::from_json_str("{}")?, AggregationConfig::default());
    Ok(())
}

#[test]
fn test_invalid_json_is_an_error() {
    let err = AggregationConfig::from_json_str(r#"{ "max_points": "many" }"#).unwrap_err();
    assert!(err.to_string().contains("invalid aggregation config"));
}

#[test]
fn test_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, r#"{{ "sketch_entries": 256, "max_size": 50 }}"#)?;

    let cfg = AggregationConfig::from_file(file.path())?;
    assert_eq!(cfg.sketch_entries, 256);
    assert_eq!(cfg.max_size, 50);
    assert_eq!(cfg.size_for(None), 50);
    Ok(())
}

#[test]
fn test_missing_file_names_the_path() {
    let err = AggregationConfig::from_file("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
}

#[test]
fn test_size_for() {
    let cfg = AggregationConfig {
        default_size: 20,
        max_size: 100,
        ..AggregationConfig::default()
    };
    assert_eq!(cfg.size_for(None), 20);
    assert_eq!(cfg.size_for(Some(5)), 5);
    assert_eq!(cfg.size_for(Some(1000)), 100);
    assert_eq!(cfg.size_for(Some(0)), 0);
}

#[test]
fn test_aggregation_builder_and_serde() -> Result<()> {
    let built = Aggregation::new()
        .field("latency")
        .size(10)
        .attribute("type", json!("CDF"))
        .attribute("points", json!([1, 2]));

    let parsed: Aggregation = serde_json::from_value(json!({
        "fields": ["latency"],
        "size": 10,
        "attributes": { "type": "CDF", "points": [1, 2] }
    }))?;
    assert_eq!(built, parsed);

    let bare: Aggregation = serde_json::from_str("{}")?;
    assert!(bare.fields.is_empty());
    assert!(bare.attributes.is_none());
    Ok(())
}
