// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end integration test driving the application layer's `analyze`
//! entry point against a scratch event log, exercising configuration
//! loading and report assembly together.

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;

use spark_lens::{analyze_reproducible, Explainer, ExplainerRegistry};

#[test]
fn analyze_reproducible_produces_a_serializable_report_with_skew_finding() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("events.ndjson");
    let mut file = std::fs::File::create(&log_path).unwrap();
    writeln!(file, r#"{{"Event":"SparkListenerApplicationStart","App ID":"app-x","App Name":"job","Timestamp":0}}"#).unwrap();
    writeln!(
        file,
        r#"{{"Event":"SparkListenerStageSubmitted","Stage Info":{{"Stage ID":0,"Stage Name":"skewed","Number of Tasks":15}},"Timestamp":0}}"#
    )
    .unwrap();
    for _ in 0..14 {
        writeln!(
            file,
            r#"{{"Event":"SparkListenerTaskEnd","Stage ID":0,"Task Info":{{"Executor ID":"1","Launch Time":0,"Finish Time":50,"Failed":false}},"Task Metrics":{{}}}}"#
        )
        .unwrap();
    }
    writeln!(
        file,
        r#"{{"Event":"SparkListenerTaskEnd","Stage ID":0,"Task Info":{{"Executor ID":"1","Launch Time":0,"Finish Time":5000,"Failed":false}},"Task Metrics":{{}}}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"Event":"SparkListenerStageCompleted","Stage Info":{{"Stage ID":0,"Number of Failed Tasks":0}},"Timestamp":5000}}"#
    )
    .unwrap();
    writeln!(file, r#"{{"Event":"SparkListenerApplicationEnd","Timestamp":5000}}"#).unwrap();

    let config_path = dir.path().join("thresholds.toml");
    std::fs::write(&config_path, "skew_ratio = 5.0\n").unwrap();
    let thresholds = spark_lens::domain::ThresholdConfig::builder()
        .skew_ratio(5.0)
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(99);
    let report = analyze_reproducible(&log_path, &thresholds, &mut rng).unwrap();

    assert_eq!(report.metrics.app_id, "app-x");
    assert!(report.num_warning + report.num_critical >= 1);
    assert!(report.findings.iter().any(|f| f.id == "skew-stage-0"));

    let value = report.to_json_value().unwrap();
    assert_eq!(value["source_path"], log_path.to_string_lossy().to_string());

    let registry = ExplainerRegistry::with_defaults();
    let explainer = registry.create("none").unwrap();
    let explanation = explainer.explain_finding(&report.findings[0].to_llm_summary());
    assert_eq!(explanation, "");
}

#[test]
fn config_layer_loads_defaults_and_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("thresholds.toml");
    std::fs::write(&config_path, "min_spill_mb = 250\n").unwrap();

    let thresholds = spark_lens::config::load_thresholds(Some(&config_path)).unwrap();
    assert_eq!(thresholds.min_spill_mb(), 250);
    assert_eq!(
        thresholds.skew_ratio(),
        spark_lens::domain::ThresholdConfig::DEFAULT_SKEW_RATIO
    );
}
