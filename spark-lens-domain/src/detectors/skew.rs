// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects task-duration skew within a stage (§4.4.1): a handful of
//! stragglers dominating an otherwise fast stage, usually a sign of uneven
//! key distribution feeding a shuffle.

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::Detector;

#[derive(Debug)]
pub struct SkewDetector;

const MIN_TASKS_CONSIDERED: u64 = 10;

impl Detector for SkewDetector {
    fn name(&self) -> &'static str {
        "skew"
    }

    fn detect(&self, metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
        metrics
            .stages
            .iter()
            .filter_map(|stage| detect_stage(stage, thresholds))
            .collect()
    }
}

fn detect_stage(stage: &StageMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    if stage.num_tasks < MIN_TASKS_CONSIDERED || stage.task_duration_median_ms <= 0 {
        return None;
    }

    let ratio = stage.task_duration_max_ms as f64 / stage.task_duration_median_ms as f64;
    if ratio < thresholds.skew_ratio() {
        return None;
    }

    let severity = if ratio > 2.0 * thresholds.skew_ratio() {
        Severity::Critical
    } else {
        Severity::Warning
    };

    let mut evidence = BTreeMap::new();
    evidence.insert("max_task_ms".to_string(), stage.task_duration_max_ms as f64);
    evidence.insert("median_task_ms".to_string(), stage.task_duration_median_ms as f64);
    evidence.insert("p90_task_ms".to_string(), stage.task_duration_p90_ms as f64);
    evidence.insert("p99_task_ms".to_string(), stage.task_duration_p99_ms as f64);
    evidence.insert("ratio".to_string(), round2(ratio));
    evidence.insert("num_tasks".to_string(), stage.num_tasks as f64);

    Some(Finding {
        id: format!("skew-stage-{}", stage.stage_id),
        detector: "skew",
        title: format!("Task skew in stage {}", stage.stage_id),
        severity,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} has a max task duration {:.2}x its median ({} ms vs {} ms), \
             indicating uneven work distribution across tasks.",
            stage.stage_id, ratio, stage.task_duration_max_ms, stage.task_duration_median_ms
        ),
        metrics: evidence,
        mitigation_tags: vec![
            MitigationTag::Salting,
            MitigationTag::Repartition,
            MitigationTag::BroadcastJoin,
        ],
        mitigation_hint: "Salt skewed join/group keys, repartition on a more even key, \
                           or broadcast the smaller side of the join."
            .to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
