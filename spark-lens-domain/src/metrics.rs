// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics Data Model
//!
//! Component C (§3): the immutable, validated results of aggregation.
//! [`StageMetrics`] is a frozen snapshot of one [`crate::aggregator::StageAggregator`];
//! [`ApplicationMetrics`] is the application-wide rollup a detector run
//! consumes. Both are plain, `Serialize`-able data — the detectors never
//! mutate them, and `ApplicationMetrics` exclusively owns its stage
//! snapshots.

use serde::{Deserialize, Serialize};

/// A frozen, per-stage snapshot produced by [`crate::aggregator::StageAggregator::freeze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub stage_id: i64,
    pub stage_name: String,
    pub num_tasks: u64,

    pub submission_time_ms: Option<i64>,
    pub completion_time_ms: Option<i64>,
    pub duration_ms: i64,

    pub task_duration_min_ms: i64,
    pub task_duration_max_ms: i64,
    pub task_duration_median_ms: i64,
    pub task_duration_p75_ms: i64,
    pub task_duration_p90_ms: i64,
    pub task_duration_p99_ms: i64,

    pub input_bytes: i64,
    pub input_records: i64,
    pub output_bytes: i64,
    pub output_records: i64,

    pub shuffle_read_bytes: i64,
    pub shuffle_write_bytes: i64,

    pub memory_bytes_spilled: i64,
    pub disk_bytes_spilled: i64,

    pub num_failed_tasks: u64,
}

impl StageMetrics {
    /// Bytes written to shuffle per byte of input read, or `0.0` when there
    /// was no input to compare against.
    pub fn shuffle_write_to_input_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.shuffle_write_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Application-wide rollup: identity, timing, the full (ascending) stage
/// list, and totals computed as sums over stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationMetrics {
    pub app_id: String,
    pub app_name: String,

    pub start_time_ms: Option<i64>,
    pub end_time_ms: Option<i64>,
    pub total_duration_ms: i64,

    /// Ascending by `stage_id` (Invariant 2, §8).
    pub stages: Vec<StageMetrics>,

    pub num_tasks: u64,
    pub num_completed_tasks: u64,
    pub num_failed_tasks: u64,

    pub num_completed_stages: u64,
    pub num_failed_stages: u64,

    pub num_executors: u64,
    pub executor_ids: Vec<String>,

    pub total_input_bytes: i64,
    pub total_output_bytes: i64,
    pub total_shuffle_read_bytes: i64,
    pub total_shuffle_write_bytes: i64,
    pub total_disk_bytes_spilled: i64,
}

impl ApplicationMetrics {
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn stage(&self, stage_id: i64) -> Option<&StageMetrics> {
        self.stages.iter().find(|s| s.stage_id == stage_id)
    }
}
