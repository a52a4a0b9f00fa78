// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Event Decoding
//!
//! Decodes a single line of a cluster-engine event log into a [`ParsedEvent`].
//!
//! The wire format is deliberately loose: events carry many fields this
//! system never reads, and producers in the wild omit fields this system
//! does read. Rather than model the full schema with `serde` structs (which
//! would make every field's absence a hard decode error), a line is first
//! parsed as an untyped [`serde_json::Value`] and then projected field by
//! field, defaulting anything missing to the zero value of its type. This
//! mirrors the log's own append-only, crash-tolerant nature: a line either
//! parses as JSON or it doesn't, and once it does, no single missing field
//! should sink the whole record.

use serde_json::Value;

/// A decoded lifecycle event. Only six discriminators are significant;
/// everything else is filtered out before this type is constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    ApplicationStart {
        app_id: String,
        app_name: String,
        timestamp_ms: i64,
    },
    ApplicationEnd {
        timestamp_ms: i64,
    },
    StageSubmitted {
        stage_id: i64,
        stage_name: String,
        num_tasks: i64,
        timestamp_ms: i64,
    },
    StageCompleted {
        stage_id: i64,
        timestamp_ms: i64,
        /// Reported by the log but not authoritative for the frozen
        /// metrics; see `Aggregator::apply` for why.
        reported_num_failed_tasks: i64,
    },
    TaskEnd {
        stage_id: i64,
        task: TaskEndRecord,
    },
    ExecutorAdded {
        executor_id: String,
    },
}

/// The subset of a `SparkListenerTaskEnd` event the aggregator consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskEndRecord {
    pub executor_id: String,
    pub launch_time_ms: i64,
    pub finish_time_ms: i64,
    pub failed: bool,
    pub input_bytes: i64,
    pub input_records: i64,
    pub output_bytes: i64,
    pub output_records: i64,
    pub shuffle_read_bytes: i64,
    pub shuffle_write_bytes: i64,
    pub memory_bytes_spilled: i64,
    pub disk_bytes_spilled: i64,
}

/// Decode one NDJSON line into a [`ParsedEvent`].
///
/// Returns `None` if the line is not valid JSON, is not a JSON object, or
/// carries an `Event` discriminator this system does not recognize. This is
/// the sole seam where "malformed record" recovery happens; callers never
/// see the decode failure.
pub fn parse_event(line: &str) -> Option<ParsedEvent> {
    let value: Value = serde_json::from_str(line).ok()?;
    let obj = value.as_object()?;
    match obj.get("Event").and_then(Value::as_str)? {
        "SparkListenerApplicationStart" => Some(ParsedEvent::ApplicationStart {
            app_id: string_field(&value, "App ID"),
            app_name: string_field(&value, "App Name"),
            timestamp_ms: i64_field(&value, "Timestamp"),
        }),
        "SparkListenerApplicationEnd" => Some(ParsedEvent::ApplicationEnd {
            timestamp_ms: i64_field(&value, "Timestamp"),
        }),
        "SparkListenerStageSubmitted" => {
            let stage_info = value.get("Stage Info").cloned().unwrap_or(Value::Null);
            Some(ParsedEvent::StageSubmitted {
                stage_id: i64_field(&stage_info, "Stage ID"),
                stage_name: string_field(&stage_info, "Stage Name"),
                num_tasks: i64_field(&stage_info, "Number of Tasks"),
                timestamp_ms: i64_field(&value, "Timestamp"),
            })
        }
        "SparkListenerStageCompleted" => {
            let stage_info = value.get("Stage Info").cloned().unwrap_or(Value::Null);
            Some(ParsedEvent::StageCompleted {
                stage_id: i64_field(&stage_info, "Stage ID"),
                timestamp_ms: i64_field(&value, "Timestamp"),
                reported_num_failed_tasks: i64_field(&stage_info, "Number of Failed Tasks"),
            })
        }
        "SparkListenerTaskEnd" => {
            let task_info = value.get("Task Info").cloned().unwrap_or(Value::Null);
            let task_metrics = value.get("Task Metrics").cloned().unwrap_or(Value::Null);
            Some(ParsedEvent::TaskEnd {
                stage_id: i64_field(&value, "Stage ID"),
                task: parse_task_end_record(&task_info, &task_metrics),
            })
        }
        "SparkListenerExecutorAdded" => Some(ParsedEvent::ExecutorAdded {
            executor_id: string_field(&value, "Executor ID"),
        }),
        _ => None,
    }
}

fn parse_task_end_record(task_info: &Value, task_metrics: &Value) -> TaskEndRecord {
    let input = task_metrics.get("Input Metrics").cloned().unwrap_or(Value::Null);
    let output = task_metrics.get("Output Metrics").cloned().unwrap_or(Value::Null);
    let shuffle_read = task_metrics
        .get("Shuffle Read Metrics")
        .cloned()
        .unwrap_or(Value::Null);
    let shuffle_write = task_metrics
        .get("Shuffle Write Metrics")
        .cloned()
        .unwrap_or(Value::Null);

    TaskEndRecord {
        executor_id: string_field(task_info, "Executor ID"),
        launch_time_ms: i64_field(task_info, "Launch Time"),
        finish_time_ms: i64_field(task_info, "Finish Time"),
        failed: bool_field(task_info, "Failed"),
        input_bytes: i64_field(&input, "Bytes Read"),
        input_records: i64_field(&input, "Records Read"),
        output_bytes: i64_field(&output, "Bytes Written"),
        output_records: i64_field(&output, "Records Written"),
        shuffle_read_bytes: i64_field(&shuffle_read, "Remote Bytes Read")
            + i64_field(&shuffle_read, "Local Bytes Read"),
        shuffle_write_bytes: i64_field(&shuffle_write, "Shuffle Bytes Written"),
        memory_bytes_spilled: i64_field(task_metrics, "Memory Bytes Spilled"),
        disk_bytes_spilled: i64_field(task_metrics, "Disk Bytes Spilled"),
    }
}

fn i64_field(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}
