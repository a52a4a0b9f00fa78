// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Streaming Aggregation
//!
//! Component B (§4.2): turns a stream of [`ParsedEvent`]s into [`ApplicationMetrics`]
//! in a single pass, with memory bounded by the number of stages rather than
//! the number of tasks. Per-stage task-duration distributions are summarized
//! with a reservoir sample (Algorithm R) instead of a full sorted vector, so
//! a stage with ten million tasks costs the same as one with a thousand.

use std::collections::BTreeMap;

use rand::RngCore;

use crate::event::{ParsedEvent, TaskEndRecord};
use crate::metrics::{ApplicationMetrics, StageMetrics};

/// Reservoir capacity per stage (§4.2): large enough that percentile
/// estimates are stable, small enough that a stage's memory footprint never
/// grows with its task count.
pub const RESERVOIR_CAPACITY: usize = 1000;

/// Per-stage running state. Exact running statistics (count, failures,
/// min/max/sum of duration, byte totals) are kept precisely; only the task
/// duration distribution used for percentiles is approximated.
#[derive(Debug, Clone)]
pub struct StageAggregator {
    stage_id: i64,
    stage_name: String,
    submission_time_ms: Option<i64>,
    completion_time_ms: Option<i64>,

    task_count: u64,
    num_failed_tasks: u64,
    duration_min_ms: i64,
    duration_max_ms: i64,
    duration_sum_ms: i64,

    reservoir: Vec<i64>,
    observations_seen: u64,

    input_bytes: i64,
    input_records: i64,
    output_bytes: i64,
    output_records: i64,
    shuffle_read_bytes: i64,
    shuffle_write_bytes: i64,
    memory_bytes_spilled: i64,
    disk_bytes_spilled: i64,
}

impl StageAggregator {
    pub fn new(stage_id: i64, stage_name: String) -> Self {
        Self {
            stage_id,
            stage_name,
            submission_time_ms: None,
            completion_time_ms: None,
            task_count: 0,
            num_failed_tasks: 0,
            duration_min_ms: i64::MAX,
            duration_max_ms: i64::MIN,
            duration_sum_ms: 0,
            reservoir: Vec::with_capacity(RESERVOIR_CAPACITY),
            observations_seen: 0,
            input_bytes: 0,
            input_records: 0,
            output_bytes: 0,
            output_records: 0,
            shuffle_read_bytes: 0,
            shuffle_write_bytes: 0,
            memory_bytes_spilled: 0,
            disk_bytes_spilled: 0,
        }
    }

    pub fn mark_submitted(&mut self, timestamp_ms: i64) {
        self.submission_time_ms = Some(timestamp_ms);
    }

    pub fn mark_completed(&mut self, timestamp_ms: i64) {
        self.completion_time_ms = Some(timestamp_ms);
    }

    /// Folds one task's end record into the running state, drawing from
    /// `rng` only when the reservoir is already full (Algorithm R).
    pub fn record_task_end(&mut self, task: &TaskEndRecord, rng: &mut dyn RngCore) {
        let duration_ms = (task.finish_time_ms - task.launch_time_ms).max(0);

        self.task_count += 1;
        if task.failed {
            self.num_failed_tasks += 1;
        }
        self.duration_min_ms = self.duration_min_ms.min(duration_ms);
        self.duration_max_ms = self.duration_max_ms.max(duration_ms);
        self.duration_sum_ms += duration_ms;

        self.observations_seen += 1;
        if self.reservoir.len() < RESERVOIR_CAPACITY {
            self.reservoir.push(duration_ms);
        } else {
            let j = rng.next_u64() % self.observations_seen;
            if j < RESERVOIR_CAPACITY as u64 {
                self.reservoir[j as usize] = duration_ms;
            }
        }

        self.input_bytes += task.input_bytes;
        self.input_records += task.input_records;
        self.output_bytes += task.output_bytes;
        self.output_records += task.output_records;
        self.shuffle_read_bytes += task.shuffle_read_bytes;
        self.shuffle_write_bytes += task.shuffle_write_bytes;
        self.memory_bytes_spilled += task.memory_bytes_spilled;
        self.disk_bytes_spilled += task.disk_bytes_spilled;
    }

    /// Consumes the aggregator, producing its frozen [`StageMetrics`].
    /// Percentiles are linearly interpolated (§4.2) over the reservoir
    /// sorted ascending; min/max/duration are the exact running values, not
    /// reservoir-derived, since the reservoir may not contain them once a
    /// stage exceeds [`RESERVOIR_CAPACITY`] tasks.
    pub fn freeze(mut self) -> StageMetrics {
        self.reservoir.sort_unstable();

        let (min_ms, max_ms) = if self.task_count == 0 {
            (0, 0)
        } else {
            (self.duration_min_ms, self.duration_max_ms)
        };

        let duration_ms = match (self.submission_time_ms, self.completion_time_ms) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        };

        StageMetrics {
            stage_id: self.stage_id,
            stage_name: self.stage_name,
            num_tasks: self.task_count,
            submission_time_ms: self.submission_time_ms,
            completion_time_ms: self.completion_time_ms,
            duration_ms,
            task_duration_min_ms: min_ms,
            task_duration_max_ms: max_ms,
            task_duration_median_ms: percentile(&self.reservoir, 50.0) as i64,
            task_duration_p75_ms: percentile(&self.reservoir, 75.0) as i64,
            task_duration_p90_ms: percentile(&self.reservoir, 90.0) as i64,
            task_duration_p99_ms: percentile(&self.reservoir, 99.0) as i64,
            input_bytes: self.input_bytes,
            input_records: self.input_records,
            output_bytes: self.output_bytes,
            output_records: self.output_records,
            shuffle_read_bytes: self.shuffle_read_bytes,
            shuffle_write_bytes: self.shuffle_write_bytes,
            memory_bytes_spilled: self.memory_bytes_spilled,
            disk_bytes_spilled: self.disk_bytes_spilled,
            num_failed_tasks: self.num_failed_tasks,
        }
    }
}

/// Linear-interpolation percentile (§4.2) over an already-sorted slice.
/// `k = (len - 1) * p / 100`; the result interpolates between the two
/// nearest ranks. Returns `0.0` for an empty slice.
pub fn percentile(sorted: &[i64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let k = (sorted.len() - 1) as f64 * (p / 100.0);
    let lo = k.floor() as usize;
    let hi = k.ceil() as usize;
    if lo == hi {
        sorted[lo] as f64
    } else {
        sorted[lo] as f64 * (hi as f64 - k) + sorted[hi] as f64 * (k - lo as f64)
    }
}

/// Whole-application aggregator: identity/timing state plus one
/// [`StageAggregator`] per stage, keyed by stage id so stages may complete
/// out of submission order.
pub struct Aggregator<'r> {
    rng: &'r mut dyn RngCore,
    app_id: String,
    app_name: String,
    start_time_ms: Option<i64>,
    end_time_ms: Option<i64>,
    stages: BTreeMap<i64, StageAggregator>,
    num_failed_stages: u64,
    executor_ids: Vec<String>,
}

impl<'r> Aggregator<'r> {
    pub fn new(rng: &'r mut dyn RngCore) -> Self {
        Self {
            rng,
            app_id: String::new(),
            app_name: String::new(),
            start_time_ms: None,
            end_time_ms: None,
            stages: BTreeMap::new(),
            num_failed_stages: 0,
            executor_ids: Vec::new(),
        }
    }

    /// Folds one decoded event into the running state.
    pub fn apply(&mut self, event: ParsedEvent) {
        match event {
            ParsedEvent::ApplicationStart {
                app_id,
                app_name,
                timestamp_ms,
            } => {
                self.app_id = app_id;
                self.app_name = app_name;
                self.start_time_ms = Some(timestamp_ms);
            }
            ParsedEvent::ApplicationEnd { timestamp_ms } => {
                self.end_time_ms = Some(timestamp_ms);
            }
            ParsedEvent::StageSubmitted {
                stage_id,
                stage_name,
                timestamp_ms,
                ..
            } => {
                Self::stage_mut(&mut self.stages, stage_id, stage_name).mark_submitted(timestamp_ms);
            }
            ParsedEvent::StageCompleted {
                stage_id,
                timestamp_ms,
                reported_num_failed_tasks,
            } => {
                // Per-task `Failed` flags are the authoritative failure
                // count; the stage-completed count is recorded but never
                // consumed, matching the event-log producer's own
                // downstream behavior.
                let _ = reported_num_failed_tasks;
                if let Some(stage) = self.stages.get_mut(&stage_id) {
                    stage.mark_completed(timestamp_ms);
                    if stage.num_failed_tasks > 0 {
                        self.num_failed_stages += 1;
                    }
                }
            }
            ParsedEvent::TaskEnd { stage_id, task } => {
                // §4.2's failure semantics are authoritative over §3's looser
                // "created on first StageSubmitted (or first TaskEnd)": a
                // TaskEnd for a stage that was never submitted is dropped,
                // not used to conjure a stage into existence. See DESIGN.md.
                if let Some(stage) = self.stages.get_mut(&stage_id) {
                    stage.record_task_end(&task, self.rng);
                }
            }
            ParsedEvent::ExecutorAdded { executor_id } => {
                self.executor_ids.push(executor_id);
            }
        }
    }

    fn stage_mut(
        stages: &mut BTreeMap<i64, StageAggregator>,
        stage_id: i64,
        stage_name: String,
    ) -> &mut StageAggregator {
        stages
            .entry(stage_id)
            .or_insert_with(|| StageAggregator::new(stage_id, stage_name))
    }

    /// Consumes the aggregator, producing the application-wide rollup.
    /// Stages are emitted ascending by id (Invariant 2, §8) because they are
    /// stored in a `BTreeMap`.
    pub fn freeze(self) -> ApplicationMetrics {
        let stages: Vec<StageMetrics> = self.stages.into_values().map(StageAggregator::freeze).collect();

        let mut num_tasks = 0u64;
        let mut num_failed_tasks = 0u64;
        let mut total_input_bytes = 0i64;
        let mut total_output_bytes = 0i64;
        let mut total_shuffle_read_bytes = 0i64;
        let mut total_shuffle_write_bytes = 0i64;
        let mut total_disk_bytes_spilled = 0i64;
        let mut num_completed_stages = 0u64;

        for stage in &stages {
            num_tasks += stage.num_tasks;
            num_failed_tasks += stage.num_failed_tasks;
            total_input_bytes += stage.input_bytes;
            total_output_bytes += stage.output_bytes;
            total_shuffle_read_bytes += stage.shuffle_read_bytes;
            total_shuffle_write_bytes += stage.shuffle_write_bytes;
            total_disk_bytes_spilled += stage.disk_bytes_spilled;
            if stage.completion_time_ms.is_some() {
                num_completed_stages += 1;
            }
        }

        let total_duration_ms = match (self.start_time_ms, self.end_time_ms) {
            (Some(start), Some(end)) => (end - start).max(0),
            _ => 0,
        };

        ApplicationMetrics {
            app_id: self.app_id,
            app_name: self.app_name,
            start_time_ms: self.start_time_ms,
            end_time_ms: self.end_time_ms,
            total_duration_ms,
            stages,
            num_tasks,
            num_completed_tasks: num_tasks - num_failed_tasks,
            num_failed_tasks,
            num_completed_stages,
            num_failed_stages: self.num_failed_stages,
            num_executors: self.executor_ids.len() as u64,
            executor_ids: self.executor_ids,
            total_input_bytes,
            total_output_bytes,
            total_shuffle_read_bytes,
            total_shuffle_write_bytes,
            total_disk_bytes_spilled,
        }
    }
}

/// Aggregates a full stream of events in one pass.
pub fn aggregate(events: impl Iterator<Item = ParsedEvent>, rng: &mut dyn RngCore) -> ApplicationMetrics {
    let mut aggregator = Aggregator::new(rng);
    for event in events {
        aggregator.apply(event);
    }
    aggregator.freeze()
}
