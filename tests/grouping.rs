mod common;

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tallybeam::grouping::{CachedGroupState, GroupKey, GroupState, GroupSummary};
use tallybeam::metric::Metric;
use tallybeam::record::Record;
use tallybeam::testing::{TestRecords, assert_close, assert_metric, pseudo_random_values, request_log};

fn all_metrics() -> Vec<Metric> {
    vec![
        Metric::count(),
        Metric::sum("x"),
        Metric::min("x"),
        Metric::max("x"),
        Metric::avg("x"),
    ]
}

fn key(pairs: &[(&str, &str)]) -> GroupKey {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn consumed(values: &[f64]) -> GroupState {
    let mut state = GroupState::ungrouped(&all_metrics());
    for r in TestRecords::new().add_numbers("x", values).build() {
        state.consume(&r);
    }
    state
}

#[test]
fn test_consume_tracks_every_metric() {
    let state = consumed(&[4.0, -2.0, 10.0]);
    assert_eq!(state.metric_value(&Metric::count()), Some(3.0));
    assert_eq!(state.metric_value(&Metric::sum("x")), Some(12.0));
    assert_eq!(state.metric_value(&Metric::min("x")), Some(-2.0));
    assert_eq!(state.metric_value(&Metric::max("x")), Some(10.0));
    assert_eq!(state.metric_value(&Metric::avg("x")), Some(4.0));
}

#[test]
fn test_missing_field_only_counts() {
    let mut state = consumed(&[1.0]);
    let before = state.clone();

    state.consume(&Record::new().with("y", json!(100)));
    state.consume(&Record::new().with("x", json!("not a number")));
    state.consume(&Record::new().with("x", json!(null)));

    assert_eq!(state.metric_value(&Metric::count()), Some(4.0));
    for metric in &all_metrics()[1..] {
        assert_eq!(state.metric_value(metric), before.metric_value(metric));
    }
}

#[test]
fn test_one_bad_field_does_not_block_others() {
    let metrics = vec![Metric::sum("a"), Metric::sum("b")];
    let mut state = GroupState::ungrouped(&metrics);
    state.consume(&Record::new().with("a", json!("oops")).with("b", json!(7)));
    assert_eq!(state.metric_value(&Metric::sum("a")), Some(0.0));
    assert_eq!(state.metric_value(&Metric::sum("b")), Some(7.0));
}

#[test]
fn test_empty_state_reads() {
    let state = GroupState::ungrouped(&all_metrics());
    assert_eq!(state.metric_value(&Metric::count()), Some(0.0));
    assert_eq!(state.metric_value(&Metric::sum("x")), Some(0.0));
    assert_eq!(state.metric_value(&Metric::min("x")), None);
    assert_eq!(state.metric_value(&Metric::max("x")), None);
    assert_eq!(state.metric_value(&Metric::avg("x")), None);
    assert_eq!(state.metric_value(&Metric::sum("untracked")), None);
}

#[test]
fn test_split_and_merge_matches_single_pass() {
    let values: Vec<f64> = (1..=30).map(f64::from).collect();
    let whole = consumed(&values);

    let mut a = consumed(&values[..7]);
    let b = consumed(&values[7..19]);
    let c = consumed(&values[19..]);
    a.merge(&b);
    a.merge(&c);

    assert_eq!(a, whole);
}

#[test]
fn test_split_and_merge_fractional_values() {
    let values = pseudo_random_values(1000, -50.0, 50.0);
    let whole = consumed(&values);

    let mut merged = consumed(&values[600..]);
    merged.merge(&consumed(&values[..250]));
    merged.merge(&consumed(&values[250..600]));

    // SUM and AVG depend on f64 summation order; the rest are exact.
    for metric in [Metric::sum("x"), Metric::avg("x")] {
        let (a, e) = (merged.metric_value(&metric), whole.metric_value(&metric));
        assert_close(a.expect("merged value"), e.expect("single-pass value"), 1e-9);
    }
    for metric in [Metric::count(), Metric::min("x"), Metric::max("x")] {
        assert_eq!(merged.metric_value(&metric), whole.metric_value(&metric));
    }
}

#[test]
fn test_merge_is_associative_and_commutative() {
    let a = consumed(&[1.0, 5.0]);
    let b = consumed(&[-3.0]);
    let c = consumed(&[8.0, 2.0, 2.0]);

    // merge(merge(A, B), C)
    let mut left = a.clone();
    left.merge(&b);
    left.merge(&c);

    // merge(A, merge(B, C))
    let mut bc = b.clone();
    bc.merge(&c);
    let mut right = a.clone();
    right.merge(&bc);

    // merge(B, merge(A, C))
    let mut ac = a.clone();
    ac.merge(&c);
    let mut swapped = b.clone();
    swapped.merge(&ac);

    assert_eq!(left, right);
    assert_eq!(left, swapped);
}

#[test]
fn test_merge_with_empty_is_identity() {
    let a = consumed(&[3.0, 9.0]);
    let mut merged = a.clone();
    merged.merge(&GroupState::ungrouped(&all_metrics()));
    assert_eq!(merged, a);
}

#[test]
#[should_panic(expected = "different metrics")]
fn test_merge_rejects_different_metric_sets() {
    let mut a = GroupState::ungrouped(&[Metric::count()]);
    let b = GroupState::ungrouped(&[Metric::count(), Metric::sum("x")]);
    a.merge(&b);
}

#[test]
fn test_as_record_renders_metrics() {
    let k = Arc::new(key(&[("host", "a")]));
    let mut state = GroupState::new(k, &all_metrics());
    state.consume(&Record::new().with("other", json!(1)));

    let out = state.as_record();
    assert_eq!(out.field_as_string("host"), "a");
    assert_eq!(out.get("COUNT"), Some(&json!(1)));
    assert_metric(&out, "SUM(x)", Some(0.0));
    assert_eq!(out.get("MIN(x)"), Some(&json!(null)));
    assert_eq!(out.get("AVG(x)"), Some(&json!(null)));
}

#[test]
fn test_alias_names_the_column() {
    let metrics = vec![Metric::avg("x").with_alias("mean")];
    let mut state = GroupState::ungrouped(&metrics);
    state.consume(&Record::new().with("x", json!(2)));
    assert_metric(&state.as_record(), "mean", Some(2.0));
}

#[test]
fn test_state_serde_keeps_metrics() -> Result<()> {
    let state = consumed(&[1.5, 2.5]);
    let text = serde_json::to_string(&state)?;
    let back: GroupState = serde_json::from_str(&text)?;
    assert_eq!(back, state);
    Ok(())
}

// ---- CachedGroupState ----

#[test]
fn test_copy_of_none_is_none() {
    assert!(CachedGroupState::copy(None).is_none());
}

#[test]
fn test_copy_is_deep() {
    let source = GroupState::new(Arc::new(key(&[("host", "a")])), &all_metrics());
    let mut copy = CachedGroupState::copy(Some(&source)).expect("copy of a state");

    assert_eq!(*copy, source);
    assert!(!Arc::ptr_eq(copy.group_key_handle(), source.group_key_handle()));

    copy.consume(&Record::new().with("x", json!(5)));
    assert_eq!(source.metric_value(&Metric::count()), Some(0.0));
    assert_eq!(copy.metric_value(&Metric::count()), Some(1.0));
}

#[test]
fn test_partial_copy_shares_key_not_metrics() {
    let template = CachedGroupState::new(GroupState::new(
        Arc::new(key(&[("host", "a")])),
        &all_metrics(),
    ));
    let mut copy = template.partial_copy();
    assert!(Arc::ptr_eq(copy.group_key_handle(), template.group_key_handle()));

    copy.consume(&Record::new().with("x", json!(5)));
    copy.consume(&Record::new().with("x", json!(7)));

    assert_eq!(copy.metric_value(&Metric::sum("x")), Some(12.0));
    assert_eq!(template.metric_value(&Metric::sum("x")), Some(0.0));
    assert_eq!(template.metric_value(&Metric::max("x")), None);
    assert_eq!(copy.group_key(), template.group_key());
}

#[test]
fn test_cached_record_is_not_part_of_equality() {
    let template = CachedGroupState::new(GroupState::ungrouped(&all_metrics()));
    let mut hinted = template.partial_copy();
    hinted.set_cached_record(Some(Arc::new(Record::new().with("x", json!(1)))));
    assert!(hinted.cached_record().is_some());
    assert_eq!(hinted, template);
    assert!(hinted.partial_copy().cached_record().is_none());
}

// ---- GroupSummary ----

fn by_service(summary: &mut GroupSummary, records: Vec<Record>) {
    let fields = vec!["service".to_string()];
    for r in records {
        let k = GroupState::key_from_record(&fields, &r);
        summary.update(Arc::new(r), [k]);
    }
}

#[test]
fn test_summary_groups_by_router_key() {
    common::init_tracing();
    let metrics = vec![Metric::count(), Metric::sum("latency")];
    let mut summary = GroupSummary::new(&metrics);
    by_service(&mut summary, request_log());

    assert_eq!(summary.len(), 3);
    let api = summary.get(&key(&[("service", "api")])).expect("api group");
    assert_eq!(api.metric_value(&Metric::count()), Some(4.0));
    assert_eq!(api.metric_value(&Metric::sum("latency")), Some(550.0));

    let db = summary.get(&key(&[("service", "db")])).expect("db group");
    assert_eq!(db.metric_value(&Metric::count()), Some(2.0));
    assert_eq!(db.metric_value(&Metric::sum("latency")), Some(5.0));
}

#[test]
fn test_summary_fans_out_one_record() {
    let mut summary = GroupSummary::new(&[Metric::sum("x")]);
    let record = Arc::new(Record::new().with("x", json!(3)));
    summary.update(
        Arc::clone(&record),
        [key(&[("tag", "red")]), key(&[("tag", "blue")])],
    );
    summary.update(record, [key(&[("tag", "red")])]);

    assert_eq!(summary.len(), 2);
    let red = summary.get(&key(&[("tag", "red")])).expect("red");
    let blue = summary.get(&key(&[("tag", "blue")])).expect("blue");
    assert_eq!(red.metric_value(&Metric::sum("x")), Some(6.0));
    assert_eq!(blue.metric_value(&Metric::sum("x")), Some(3.0));
    assert!(red.cached_record().is_none());
}

#[test]
fn test_summary_records_sorted_and_capped() {
    let mut summary = GroupSummary::new(&[Metric::count()]).with_max_groups(2);
    by_service(&mut summary, request_log());

    let out = summary.into_records();
    let services: Vec<String> = out.iter().map(|r| r.field_as_string("service")).collect();
    assert_eq!(services, vec!["api", "db"]);
}

#[test]
fn test_summary_merge_matches_single_partition() {
    let metrics = vec![Metric::count(), Metric::avg("latency"), Metric::max("latency")];
    let records = request_log();

    let mut whole = GroupSummary::new(&metrics);
    by_service(&mut whole, records.clone());

    let (head, tail) = records.split_at(4);
    let mut left = GroupSummary::new(&metrics);
    by_service(&mut left, head.to_vec());
    let mut right = GroupSummary::new(&metrics);
    by_service(&mut right, tail.to_vec());
    right.merge(left);

    assert_eq!(right.into_records(), whole.into_records());
}
