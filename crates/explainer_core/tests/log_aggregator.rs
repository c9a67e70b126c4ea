use explainer_core::{LogAggregator, LogSource, MAX_LOG_LINES};

#[test]
fn combined_view_keeps_the_most_recent_lines_in_order() {
    let mut logs = LogAggregator::new();
    for i in 0..500 {
        logs.push_client("t", format!("line {i}"));
    }

    let combined = logs.combined();

    assert_eq!(combined.len(), MAX_LOG_LINES);
    assert_eq!(combined.first().unwrap().text, "line 100");
    assert_eq!(combined.last().unwrap().text, "line 499");
    assert!(combined.windows(2).all(|pair| pair[0].seq < pair[1].seq));
}

#[test]
fn combined_view_caps_across_both_streams() {
    let mut logs = LogAggregator::new();
    for i in 0..300 {
        logs.push_client("t", format!("client {i}"));
    }
    let generator: Vec<String> = (0..200).map(|i| format!("gen {i}")).collect();
    logs.merge_generator(&generator, "t");

    let combined = logs.combined();

    assert_eq!(combined.len(), MAX_LOG_LINES);
    assert_eq!(combined[0].text, "client 100");
    assert_eq!(combined[199].text, "client 299");
    assert_eq!(combined[200].source, LogSource::Generator);
    assert_eq!(combined[399].text, "gen 199");
}

#[test]
fn trimmed_generator_stream_still_merges_by_length() {
    let mut logs = LogAggregator::new();
    let mut snapshot: Vec<String> = (0..450).map(|i| format!("gen {i}")).collect();
    logs.merge_generator(&snapshot, "t");
    assert_eq!(logs.generator_lines().count(), MAX_LOG_LINES);
    assert_eq!(logs.generator_seen(), 450);

    snapshot.push("gen 450".to_string());
    let outcome = logs.merge_generator(&snapshot, "t");

    assert_eq!(outcome.appended(), 1);
    let last = logs.combined().last().map(|line| line.text.clone());
    assert_eq!(last.as_deref(), Some("gen 450"));
}
