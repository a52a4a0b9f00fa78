// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects driver-side bottlenecks (§4.4.6): stage wall time that vastly
//! outruns the single longest task (scheduling/coordination overhead), and
//! late stages whose output is large enough to suggest an expensive
//! `collect()` back to the driver.

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::{mib, Detector};

#[derive(Debug)]
pub struct DriverDetector;

const SCHEDULING_RATIO_THRESHOLD: f64 = 5.0;
const LARGE_RESULT_CANDIDATE_COUNT: usize = 3;

impl Detector for DriverDetector {
    fn name(&self) -> &'static str {
        "driver"
    }

    fn detect(&self, metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
        let mut findings: Vec<Finding> = metrics
            .stages
            .iter()
            .filter_map(|stage| detect_scheduling(stage, thresholds))
            .collect();

        findings.extend(detect_large_late_results(metrics, thresholds));
        findings
    }
}

fn detect_scheduling(stage: &StageMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    if stage.num_tasks == 0 || stage.task_duration_max_ms <= 0 {
        return None;
    }

    let ratio = stage.duration_ms as f64 / stage.task_duration_max_ms as f64;
    if ratio <= SCHEDULING_RATIO_THRESHOLD || stage.duration_ms <= thresholds.max_scheduling_delay_ms() as i64 {
        return None;
    }

    let mut evidence = BTreeMap::new();
    evidence.insert("stage_duration_ms".to_string(), stage.duration_ms as f64);
    evidence.insert("max_task_ms".to_string(), stage.task_duration_max_ms as f64);
    evidence.insert("ratio".to_string(), round2(ratio));

    Some(Finding {
        id: format!("driver-scheduling-stage-{}", stage.stage_id),
        detector: "driver",
        title: format!("Scheduling overhead in stage {}", stage.stage_id),
        severity: Severity::Warning,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} took {} ms overall but its longest task ran only {} ms ({:.2}x), \
             suggesting scheduling or coordination overhead rather than compute time.",
            stage.stage_id, stage.duration_ms, stage.task_duration_max_ms, ratio
        ),
        metrics: evidence,
        mitigation_tags: vec![MitigationTag::Coalesce, MitigationTag::CheckDataSource],
        mitigation_hint: "Coalesce into fewer, larger tasks to reduce scheduler round-trips, \
                           and check for an external bottleneck (e.g. a slow catalog call)."
            .to_string(),
    })
}

fn detect_large_late_results(metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
    let mut candidate_ids: Vec<i64> = metrics.stages.iter().map(|s| s.stage_id).collect();
    candidate_ids.sort_unstable();
    let late_ids: Vec<i64> = candidate_ids
        .into_iter()
        .rev()
        .take(LARGE_RESULT_CANDIDATE_COUNT)
        .collect();

    late_ids
        .into_iter()
        .filter_map(|stage_id| metrics.stage(stage_id))
        .filter_map(|stage| detect_large_result(stage, thresholds))
        .collect()
}

fn detect_large_result(stage: &StageMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    let output_mib = mib(stage.output_bytes);
    if output_mib <= thresholds.max_result_size_mb() as f64 {
        return None;
    }

    let mut evidence = BTreeMap::new();
    evidence.insert("output_mib".to_string(), round2(output_mib));

    Some(Finding {
        id: format!("driver-large-result-stage-{}", stage.stage_id),
        detector: "driver",
        title: format!("Large late-stage result in stage {}", stage.stage_id),
        severity: Severity::Warning,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} is among the application's last stages and produced {:.2} MiB of \
             output, which the driver may be collecting in full.",
            stage.stage_id, output_mib
        ),
        metrics: evidence,
        mitigation_tags: vec![MitigationTag::ReduceCollect, MitigationTag::CheckDataSource],
        mitigation_hint: "Avoid collecting large results to the driver; write directly to \
                           storage or aggregate further before collecting."
            .to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
