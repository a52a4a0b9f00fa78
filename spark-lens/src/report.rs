// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Report Envelope
//!
//! Component F's output, wrapped for a caller outside this crate (§6): the
//! source path, an ISO-8601 analysis timestamp, summary counts, and the
//! finding list in canonical order. This crate does not render the report —
//! that is a Non-goal — but it does provide the data shape and two ad hoc
//! convenience methods in the same spirit as `adaptive-pipeline`'s own
//! entities summarizing themselves (`ProcessingMetrics`, for example).

use chrono::{DateTime, Utc};
use serde::Serialize;

use spark_lens_domain::{ApplicationMetrics, Finding, FindingCollection, Severity};

/// The full result of one analysis run, ready to be serialized or handed to
/// an external renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source_path: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub metrics: ApplicationMetrics,
    pub findings: Vec<Finding>,
    pub num_critical: usize,
    pub num_warning: usize,
    pub num_info: usize,
}

impl Report {
    /// Assembles a report from an analysis result. `findings` is stored in
    /// canonical severity order (§4.5); `analysis_timestamp` is the instant
    /// this method runs, not any timestamp found in the event log.
    pub fn new(source_path: impl Into<String>, metrics: ApplicationMetrics, findings: &FindingCollection, now: DateTime<Utc>) -> Self {
        let ordered: Vec<Finding> = findings.sorted_by_severity().into_iter().cloned().collect();
        Self {
            source_path: source_path.into(),
            analysis_timestamp: now,
            num_critical: findings.by_severity(Severity::Critical).len(),
            num_warning: findings.by_severity(Severity::Warning).len(),
            num_info: findings.by_severity(Severity::Info).len(),
            metrics,
            findings: ordered,
        }
    }

    /// A short plain-text digest: identity, duration, stage/task counts, and
    /// the top five findings by canonical order. Not a rendering subsystem —
    /// a one-shot convenience akin to `report.py`'s `Report.summary()`.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "{} ({}) — {} stages, {} tasks, {} ms",
                self.metrics.app_name, self.metrics.app_id, self.metrics.num_stages(), self.metrics.num_tasks, self.metrics.total_duration_ms
            ),
            format!(
                "{} critical, {} warning, {} info finding(s)",
                self.num_critical, self.num_warning, self.num_info
            ),
        ];
        for finding in self.findings.iter().take(5) {
            lines.push(format!("  [{}] {}: {}", finding.severity, finding.id, finding.title));
        }
        lines.join("\n")
    }

    /// The report as a `serde_json::Value`, mirroring the literal attribute
    /// set §6 specifies for the JSON encoding of a report and its findings.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
