// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects memory pressure spilling to disk (§4.4.3): tasks that overflow
//! their execution memory and fall back to disk-backed sort/aggregation
//! buffers, a direct throughput tax.

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::{mib, Detector};

#[derive(Debug)]
pub struct SpillDetector;

impl Detector for SpillDetector {
    fn name(&self) -> &'static str {
        "spill"
    }

    fn detect(&self, metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
        let mut findings: Vec<Finding> = metrics
            .stages
            .iter()
            .filter_map(|stage| detect_stage(stage, thresholds))
            .collect();

        if let Some(global) = detect_global(metrics, thresholds) {
            findings.push(global);
        }

        findings
    }
}

fn detect_stage(stage: &StageMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    let spilled_mib = mib(stage.disk_bytes_spilled);
    let min_spill_mb = thresholds.min_spill_mb() as f64;
    if spilled_mib < min_spill_mb {
        return None;
    }

    let severity = if spilled_mib > 10.0 * min_spill_mb {
        Severity::Critical
    } else if spilled_mib > 3.0 * min_spill_mb {
        Severity::Warning
    } else {
        Severity::Info
    };

    let mut evidence = BTreeMap::new();
    evidence.insert("disk_spilled_mib".to_string(), round2(spilled_mib));
    evidence.insert(
        "memory_spilled_mib".to_string(),
        round2(mib(stage.memory_bytes_spilled)),
    );

    Some(Finding {
        id: format!("spill-stage-{}", stage.stage_id),
        detector: "spill",
        title: format!("Disk spill in stage {}", stage.stage_id),
        severity,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} spilled {:.2} MiB to disk, indicating task memory pressure.",
            stage.stage_id, spilled_mib
        ),
        metrics: evidence,
        mitigation_tags: vec![
            MitigationTag::IncreaseMemory,
            MitigationTag::Repartition,
            MitigationTag::ReduceParallelism,
            MitigationTag::EnableAqe,
        ],
        mitigation_hint: "Increase executor memory, repartition to shrink per-task working \
                           sets, or reduce parallelism so each task gets more memory."
            .to_string(),
    })
}

fn detect_global(metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    let total_spilled_mib = mib(metrics.total_disk_bytes_spilled);
    let threshold = 5.0 * thresholds.min_spill_mb() as f64;
    if total_spilled_mib < threshold {
        return None;
    }

    let stage_ids: Vec<i64> = metrics
        .stages
        .iter()
        .filter(|s| s.disk_bytes_spilled > 0)
        .map(|s| s.stage_id)
        .collect();

    let mut evidence = BTreeMap::new();
    evidence.insert("total_disk_spilled_mib".to_string(), round2(total_spilled_mib));

    Some(Finding {
        id: "spill-total".to_string(),
        detector: "spill",
        title: "Application-wide disk spill".to_string(),
        severity: Severity::Warning,
        stage_ids,
        description: format!(
            "The application spilled {:.2} MiB to disk across all stages.",
            total_spilled_mib
        ),
        metrics: evidence,
        mitigation_tags: vec![
            MitigationTag::IncreaseMemory,
            MitigationTag::Repartition,
            MitigationTag::ReduceParallelism,
            MitigationTag::EnableAqe,
        ],
        mitigation_hint: "Review executor memory sizing and partition counts across the \
                           whole application, not just the worst single stage."
            .to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(stage_id: i64, disk_bytes_spilled: i64) -> StageMetrics {
        StageMetrics {
            stage_id,
            stage_name: "s".to_string(),
            num_tasks: 1,
            submission_time_ms: None,
            completion_time_ms: None,
            duration_ms: 0,
            task_duration_min_ms: 0,
            task_duration_max_ms: 0,
            task_duration_median_ms: 0,
            task_duration_p75_ms: 0,
            task_duration_p90_ms: 0,
            task_duration_p99_ms: 0,
            input_bytes: 0,
            input_records: 0,
            output_bytes: 0,
            output_records: 0,
            shuffle_read_bytes: 0,
            shuffle_write_bytes: 0,
            memory_bytes_spilled: 0,
            disk_bytes_spilled,
            num_failed_tasks: 0,
        }
    }

    const ONE_MIB: i64 = 1024 * 1024;

    #[test]
    fn flags_critical_spill() {
        let thresholds = ThresholdConfig::default();
        let s = stage(1, 2000 * ONE_MIB);
        let finding = detect_stage(&s, &thresholds).expect("should flag");
        assert_eq!(finding.severity, Severity::Critical);
    }

    #[test]
    fn flags_info_spill_just_above_minimum() {
        let thresholds = ThresholdConfig::default();
        let s = stage(2, 150 * ONE_MIB);
        let finding = detect_stage(&s, &thresholds).expect("should flag");
        assert_eq!(finding.severity, Severity::Info);
    }

    #[test]
    fn ignores_spill_below_minimum() {
        let thresholds = ThresholdConfig::default();
        let s = stage(3, 10 * ONE_MIB);
        assert!(detect_stage(&s, &thresholds).is_none());
    }
}
