// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects partition-count inefficiency (§4.4.4): too many tiny tasks
//! (scheduler overhead dwarfs real work) or too few large ones (no
//! parallelism to speak of).

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::Detector;

#[derive(Debug)]
pub struct PartitionInefficiencyDetector;

const UNDER_PARTITIONED_TASK_CEILING: u64 = 10;
const UNDER_PARTITIONED_MEDIAN_FLOOR_MS: i64 = 60_000;

impl Detector for PartitionInefficiencyDetector {
    fn name(&self) -> &'static str {
        "partition-inefficiency"
    }

    fn detect(&self, metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
        metrics
            .stages
            .iter()
            .filter_map(|stage| detect_stage(stage, metrics, thresholds))
            .collect()
    }
}

fn detect_stage(
    stage: &StageMetrics,
    metrics: &ApplicationMetrics,
    thresholds: &ThresholdConfig,
) -> Option<Finding> {
    if stage.num_tasks >= thresholds.min_tasks_for_inefficiency()
        && stage.task_duration_median_ms <= thresholds.max_task_runtime_ms_for_inefficiency() as i64
    {
        return Some(over_partitioned(stage));
    }

    if stage.num_tasks < UNDER_PARTITIONED_TASK_CEILING
        && stage.task_duration_median_ms > UNDER_PARTITIONED_MEDIAN_FLOOR_MS
    {
        return Some(under_partitioned(stage, metrics));
    }

    None
}

fn over_partitioned(stage: &StageMetrics) -> Finding {
    let target_partitions = (stage.num_tasks / 10).max(1);

    let mut evidence = BTreeMap::new();
    evidence.insert("num_tasks".to_string(), stage.num_tasks as f64);
    evidence.insert("median_task_ms".to_string(), stage.task_duration_median_ms as f64);
    evidence.insert("target_partitions".to_string(), target_partitions as f64);

    Finding {
        id: format!("partition-inefficiency-stage-{}", stage.stage_id),
        detector: "partition-inefficiency",
        title: format!("Over-partitioned stage {}", stage.stage_id),
        severity: Severity::Warning,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} ran {} tasks with a median duration of only {} ms; per-task overhead \
             likely dominates the actual work.",
            stage.stage_id, stage.num_tasks, stage.task_duration_median_ms
        ),
        metrics: evidence,
        mitigation_tags: vec![MitigationTag::Coalesce, MitigationTag::ReduceParallelism],
        mitigation_hint: format!(
            "Coalesce toward roughly {} partitions to reduce scheduling overhead.",
            target_partitions
        ),
    }
}

fn under_partitioned(stage: &StageMetrics, metrics: &ApplicationMetrics) -> Finding {
    let target_partitions = 2 * metrics.num_executors;

    let mut evidence = BTreeMap::new();
    evidence.insert("num_tasks".to_string(), stage.num_tasks as f64);
    evidence.insert("median_task_ms".to_string(), stage.task_duration_median_ms as f64);
    evidence.insert("target_partitions".to_string(), target_partitions as f64);

    Finding {
        id: format!("under-partitioned-stage-{}", stage.stage_id),
        detector: "partition-inefficiency",
        title: format!("Under-partitioned stage {}", stage.stage_id),
        severity: Severity::Info,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} ran only {} tasks with a median duration of {} ms; available \
             parallelism is likely underused.",
            stage.stage_id, stage.num_tasks, stage.task_duration_median_ms
        ),
        metrics: evidence,
        mitigation_tags: vec![MitigationTag::Repartition, MitigationTag::IncreaseParallelism],
        mitigation_hint: format!(
            "Repartition toward roughly {} partitions to use available executors.",
            target_partitions
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(stage_id: i64, num_tasks: u64, median_ms: i64) -> StageMetrics {
        StageMetrics {
            stage_id,
            stage_name: "s".to_string(),
            num_tasks,
            submission_time_ms: None,
            completion_time_ms: None,
            duration_ms: 0,
            task_duration_min_ms: median_ms,
            task_duration_max_ms: median_ms,
            task_duration_median_ms: median_ms,
            task_duration_p75_ms: median_ms,
            task_duration_p90_ms: median_ms,
            task_duration_p99_ms: median_ms,
            input_bytes: 0,
            input_records: 0,
            output_bytes: 0,
            output_records: 0,
            shuffle_read_bytes: 0,
            shuffle_write_bytes: 0,
            memory_bytes_spilled: 0,
            disk_bytes_spilled: 0,
            num_failed_tasks: 0,
        }
    }

    fn app(stages: Vec<StageMetrics>, num_executors: u64) -> ApplicationMetrics {
        ApplicationMetrics {
            app_id: "a".to_string(),
            app_name: "a".to_string(),
            start_time_ms: None,
            end_time_ms: None,
            total_duration_ms: 0,
            stages,
            num_tasks: 0,
            num_completed_tasks: 0,
            num_failed_tasks: 0,
            num_completed_stages: 0,
            num_failed_stages: 0,
            num_executors,
            executor_ids: vec![],
            total_input_bytes: 0,
            total_output_bytes: 0,
            total_shuffle_read_bytes: 0,
            total_shuffle_write_bytes: 0,
            total_disk_bytes_spilled: 0,
        }
    }

    #[test]
    fn flags_over_partitioned_stage() {
        let thresholds = ThresholdConfig::default();
        let s = stage(1, 500, 50);
        let metrics = app(vec![s.clone()], 4);
        let finding = detect_stage(&s, &metrics, &thresholds).expect("should flag");
        assert_eq!(finding.id, "partition-inefficiency-stage-1");
        assert_eq!(finding.metrics["target_partitions"], 50.0);
    }

    #[test]
    fn flags_under_partitioned_stage() {
        let thresholds = ThresholdConfig::default();
        let s = stage(2, 3, 90_000);
        let metrics = app(vec![s.clone()], 4);
        let finding = detect_stage(&s, &metrics, &thresholds).expect("should flag");
        assert_eq!(finding.id, "under-partitioned-stage-2");
        assert_eq!(finding.metrics["target_partitions"], 8.0);
    }

    #[test]
    fn ignores_well_partitioned_stage() {
        let thresholds = ThresholdConfig::default();
        let s = stage(3, 50, 5_000);
        let metrics = app(vec![s.clone()], 4);
        assert!(detect_stage(&s, &metrics, &thresholds).is_none());
    }
}
