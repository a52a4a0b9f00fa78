// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end scenarios from §8's literal-input table: one event log, one
//! expected shape of findings, covering the seven cases the distilled
//! specification names plus malformed-record tolerance.

use rand::rngs::StdRng;
use rand::SeedableRng;

use spark_lens_domain::{analyze_with_rng, Severity, ThresholdConfig};

fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "spark-lens-scenario-{}-{}.ndjson",
        name,
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

fn task_line(stage_id: i64, launch: i64, finish: i64) -> String {
    format!(
        r#"{{"Event":"SparkListenerTaskEnd","Stage ID":{stage_id},"Task Info":{{"Executor ID":"1","Launch Time":{launch},"Finish Time":{finish},"Failed":false}},"Task Metrics":{{}}}}"#
    )
}

#[test]
fn scenario_skew_critical() {
    let mut lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"skew-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"skewed","Number of Tasks":20},"Timestamp":0}"#.to_string(),
    ];
    for _ in 0..19 {
        lines.push(task_line(0, 0, 100));
    }
    lines.push(task_line(0, 0, 3000)); // 30x median: critical (> 2 * skew_ratio=10)
    lines.push(r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":3000}"#.to_string());
    lines.push(r#"{"Event":"SparkListenerApplicationEnd","Timestamp":3000}"#.to_string());

    let path = write_fixture("skew-critical", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(1);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    let skew_findings = result.findings.by_detector("skew");
    assert_eq!(skew_findings.len(), 1);
    assert_eq!(skew_findings[0].severity, Severity::Critical);
    assert_eq!(skew_findings[0].id, "skew-stage-0");
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_balanced_job_has_no_findings() {
    let mut lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"balanced-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"even","Number of Tasks":12},"Timestamp":0}"#.to_string(),
    ];
    for _ in 0..12 {
        lines.push(task_line(0, 0, 100));
    }
    lines.push(r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":100}"#.to_string());
    lines.push(r#"{"Event":"SparkListenerApplicationEnd","Timestamp":100}"#.to_string());

    let path = write_fixture("balanced", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(2);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    assert!(result.findings.is_empty());
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_shuffle_explosion() {
    let lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"shuffle-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"explode","Number of Tasks":1},"Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerTaskEnd","Stage ID":0,"Task Info":{"Executor ID":"1","Launch Time":0,"Finish Time":100,"Failed":false},"Task Metrics":{"Input Metrics":{"Bytes Read":1000000},"Shuffle Write Metrics":{"Shuffle Bytes Written":10000000}}}"#.to_string(),
        r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":100}"#.to_string(),
        r#"{"Event":"SparkListenerApplicationEnd","Timestamp":100}"#.to_string(),
    ];

    let path = write_fixture("shuffle-explosion", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(3);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    let shuffle_findings = result.findings.by_detector("shuffle-explosion");
    assert!(shuffle_findings.iter().any(|f| f.id == "shuffle-explosion-stage-0"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_spill_warning() {
    let lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"spill-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"spilly","Number of Tasks":1},"Timestamp":0}"#.to_string(),
        format!(
            r#"{{"Event":"SparkListenerTaskEnd","Stage ID":0,"Task Info":{{"Executor ID":"1","Launch Time":0,"Finish Time":100,"Failed":false}},"Task Metrics":{{"Disk Bytes Spilled":{}}}}}"#,
            400 * 1024 * 1024
        ),
        r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":100}"#.to_string(),
        r#"{"Event":"SparkListenerApplicationEnd","Timestamp":100}"#.to_string(),
    ];

    let path = write_fixture("spill-warning", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(4);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    let spill_findings = result.findings.by_detector("spill");
    let stage_finding = spill_findings.iter().find(|f| f.id == "spill-stage-0").unwrap();
    assert_eq!(stage_finding.severity, Severity::Warning);
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_over_partitioned() {
    let mut lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"over-partitioned-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"tiny-tasks","Number of Tasks":500},"Timestamp":0}"#.to_string(),
    ];
    for _ in 0..500 {
        lines.push(task_line(0, 0, 10));
    }
    lines.push(r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":10}"#.to_string());
    lines.push(r#"{"Event":"SparkListenerApplicationEnd","Timestamp":10}"#.to_string());

    let path = write_fixture("over-partitioned", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(5);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    let findings = result.findings.by_detector("partition-inefficiency");
    assert!(findings.iter().any(|f| f.id == "partition-inefficiency-stage-0"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_malformed_tail_is_tolerated() {
    let lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"malformed-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"s","Number of Tasks":1},"Timestamp":0}"#.to_string(),
        task_line(0, 0, 100),
        "{this is not valid json at all".to_string(),
        r#"{"Event":"SparkListenerUnknownEvent","Foo":"bar"}"#.to_string(),
        "".to_string(),
    ];

    let path = write_fixture("malformed-tail", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(6);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    assert_eq!(result.metrics.app_id, "malformed-app");
    assert_eq!(result.metrics.num_stages(), 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn scenario_two_task_duration_percentiles() {
    let lines = vec![
        r#"{"Event":"SparkListenerApplicationStart","App ID":"two-task-app","App Name":"job","Timestamp":0}"#.to_string(),
        r#"{"Event":"SparkListenerStageSubmitted","Stage Info":{"Stage ID":0,"Stage Name":"s","Number of Tasks":2},"Timestamp":0}"#.to_string(),
        task_line(0, 0, 400),
        task_line(0, 0, 500),
        r#"{"Event":"SparkListenerStageCompleted","Stage Info":{"Stage ID":0,"Number of Failed Tasks":0},"Timestamp":500}"#.to_string(),
        r#"{"Event":"SparkListenerApplicationEnd","Timestamp":500}"#.to_string(),
    ];

    let path = write_fixture("two-task-duration", &lines.join("\n"));
    let mut rng = StdRng::seed_from_u64(7);
    let result = analyze_with_rng(&path, &ThresholdConfig::default(), &mut rng).unwrap();

    let stage = result.metrics.stage(0).unwrap();
    assert_eq!(stage.task_duration_min_ms, 400);
    assert_eq!(stage.task_duration_max_ms, 500);
    assert_eq!(stage.task_duration_median_ms, 450);
    let _ = std::fs::remove_file(path);
}
