// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects I/O-dominant stages (§4.4.5): stages whose wall-clock time is
//! plausibly explained by bytes moved per task rather than compute, which
//! points at storage layout or predicate pushdown rather than shuffle or
//! skew.

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::{mib, Detector};

#[derive(Debug)]
pub struct IoDetector;

const SHUFFLE_READ_MIB_PER_TASK_THRESHOLD: f64 = 100.0;
const SHUFFLE_READ_MEDIAN_MS_THRESHOLD: i64 = 10_000;
const INPUT_MIB_PER_TASK_THRESHOLD: f64 = 500.0;
const INPUT_MEDIAN_MS_THRESHOLD: i64 = 30_000;

impl Detector for IoDetector {
    fn name(&self) -> &'static str {
        "io"
    }

    fn detect(&self, metrics: &ApplicationMetrics, _thresholds: &ThresholdConfig) -> Vec<Finding> {
        metrics.stages.iter().filter_map(detect_stage).collect()
    }
}

fn detect_stage(stage: &StageMetrics) -> Option<Finding> {
    if stage.duration_ms == 0 || stage.num_tasks == 0 {
        return None;
    }

    let avg_shuffle_read_mib = mib(stage.shuffle_read_bytes) / stage.num_tasks as f64;
    if stage.shuffle_read_bytes > 0
        && avg_shuffle_read_mib > SHUFFLE_READ_MIB_PER_TASK_THRESHOLD
        && stage.task_duration_median_ms > SHUFFLE_READ_MEDIAN_MS_THRESHOLD
    {
        let mut evidence = BTreeMap::new();
        evidence.insert("avg_shuffle_read_mib_per_task".to_string(), round2(avg_shuffle_read_mib));
        evidence.insert("median_task_ms".to_string(), stage.task_duration_median_ms as f64);

        return Some(Finding {
            id: format!("io-shuffle-stage-{}", stage.stage_id),
            detector: "io",
            title: format!("Shuffle-read-bound stage {}", stage.stage_id),
            severity: Severity::Warning,
            stage_ids: vec![stage.stage_id],
            description: format!(
                "Stage {} reads {:.2} MiB of shuffle data per task on average, with a median \
                 task duration of {} ms; shuffle read volume likely dominates runtime.",
                stage.stage_id, avg_shuffle_read_mib, stage.task_duration_median_ms
            ),
            metrics: evidence,
            mitigation_tags: vec![MitigationTag::OptimizeShuffle, MitigationTag::CheckDataSource],
            mitigation_hint: "Reduce shuffle read volume by filtering earlier or restructuring \
                               the shuffle; check for unnecessary wide transformations."
                .to_string(),
        });
    }

    let avg_input_mib = mib(stage.input_bytes) / stage.num_tasks as f64;
    if stage.input_bytes > 0
        && avg_input_mib > INPUT_MIB_PER_TASK_THRESHOLD
        && stage.task_duration_median_ms > INPUT_MEDIAN_MS_THRESHOLD
    {
        let mut evidence = BTreeMap::new();
        evidence.insert("avg_input_mib_per_task".to_string(), round2(avg_input_mib));
        evidence.insert("median_task_ms".to_string(), stage.task_duration_median_ms as f64);

        return Some(Finding {
            id: format!("io-input-stage-{}", stage.stage_id),
            detector: "io",
            title: format!("Input-read-bound stage {}", stage.stage_id),
            severity: Severity::Info,
            stage_ids: vec![stage.stage_id],
            description: format!(
                "Stage {} reads {:.2} MiB of input per task on average, with a median task \
                 duration of {} ms; source read volume likely dominates runtime.",
                stage.stage_id, avg_input_mib, stage.task_duration_median_ms
            ),
            metrics: evidence,
            mitigation_tags: vec![MitigationTag::CheckDataSource],
            mitigation_hint: "Check the data source layout: smaller file splits, column \
                               pruning, or predicate pushdown may cut bytes read per task."
                .to_string(),
        });
    }

    None
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(
        stage_id: i64,
        num_tasks: u64,
        duration_ms: i64,
        median_ms: i64,
        shuffle_read_bytes: i64,
        input_bytes: i64,
    ) -> StageMetrics {
        StageMetrics {
            stage_id,
            stage_name: "s".to_string(),
            num_tasks,
            submission_time_ms: None,
            completion_time_ms: None,
            duration_ms,
            task_duration_min_ms: median_ms,
            task_duration_max_ms: median_ms,
            task_duration_median_ms: median_ms,
            task_duration_p75_ms: median_ms,
            task_duration_p90_ms: median_ms,
            task_duration_p99_ms: median_ms,
            input_bytes,
            input_records: 0,
            output_bytes: 0,
            output_records: 0,
            shuffle_read_bytes,
            shuffle_write_bytes: 0,
            memory_bytes_spilled: 0,
            disk_bytes_spilled: 0,
            num_failed_tasks: 0,
        }
    }

    const ONE_MIB: i64 = 1024 * 1024;

    #[test]
    fn flags_shuffle_read_bound_stage() {
        let s = stage(1, 10, 200_000, 15_000, 2000 * ONE_MIB, 0);
        let finding = detect_stage(&s).expect("should flag");
        assert_eq!(finding.id, "io-shuffle-stage-1");
    }

    #[test]
    fn flags_input_bound_stage_when_no_shuffle() {
        let s = stage(2, 10, 400_000, 35_000, 0, 6000 * ONE_MIB);
        let finding = detect_stage(&s).expect("should flag");
        assert_eq!(finding.id, "io-input-stage-2");
    }

    #[test]
    fn ignores_fast_stage() {
        let s = stage(3, 10, 1_000, 500, 2000 * ONE_MIB, 0);
        assert!(detect_stage(&s).is_none());
    }
}
