// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Detects shuffle explosion (§4.4.2): a stage (or an entire application)
//! writing far more shuffle data than it read as input, typically from a
//! join or aggregation that fans data out before reducing it.

use std::collections::BTreeMap;

use crate::finding::{Finding, MitigationTag, Severity};
use crate::metrics::{ApplicationMetrics, StageMetrics};
use crate::threshold::ThresholdConfig;

use super::Detector;

#[derive(Debug)]
pub struct ShuffleExplosionDetector;

impl Detector for ShuffleExplosionDetector {
    fn name(&self) -> &'static str {
        "shuffle-explosion"
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
    if stage.input_bytes <= 0 || stage.shuffle_write_bytes <= 0 {
        return None;
    }

    let ratio = stage.shuffle_write_bytes as f64 / stage.input_bytes as f64;
    if ratio < thresholds.shuffle_explosion_ratio() {
        return None;
    }

    let severity = if ratio > 2.0 * thresholds.shuffle_explosion_ratio() {
        Severity::Critical
    } else {
        Severity::Warning
    };

    let mut evidence = BTreeMap::new();
    evidence.insert("input_bytes".to_string(), stage.input_bytes as f64);
    evidence.insert("shuffle_write_bytes".to_string(), stage.shuffle_write_bytes as f64);
    evidence.insert("ratio".to_string(), round2(ratio));

    Some(Finding {
        id: format!("shuffle-explosion-stage-{}", stage.stage_id),
        detector: "shuffle-explosion",
        title: format!("Shuffle explosion in stage {}", stage.stage_id),
        severity,
        stage_ids: vec![stage.stage_id],
        description: format!(
            "Stage {} wrote {:.2}x its input size to shuffle, suggesting a fan-out \
             join or aggregation before any reduction.",
            stage.stage_id, ratio
        ),
        metrics: evidence,
        mitigation_tags: vec![
            MitigationTag::BroadcastJoin,
            MitigationTag::FilterEarly,
            MitigationTag::OptimizeShuffle,
        ],
        mitigation_hint: "Broadcast the smaller join side, filter rows before the shuffle, \
                           or restructure the shuffle to reduce fan-out."
            .to_string(),
    })
}

fn detect_global(metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Option<Finding> {
    if metrics.total_input_bytes <= 0 {
        return None;
    }

    let shuffle_total = metrics.total_shuffle_read_bytes + metrics.total_shuffle_write_bytes;
    let ratio = shuffle_total as f64 / metrics.total_input_bytes as f64;
    let threshold = 2.0 * thresholds.shuffle_explosion_ratio();
    if ratio < threshold {
        return None;
    }

    let mut evidence = BTreeMap::new();
    evidence.insert("total_input_bytes".to_string(), metrics.total_input_bytes as f64);
    evidence.insert("total_shuffle_bytes".to_string(), shuffle_total as f64);
    evidence.insert("ratio".to_string(), round2(ratio));

    Some(Finding {
        id: "shuffle-explosion-global".to_string(),
        detector: "shuffle-explosion",
        title: "Application-wide shuffle explosion".to_string(),
        severity: Severity::Warning,
        stage_ids: vec![],
        description: format!(
            "Total shuffle read+write across the application is {:.2}x total input, \
             well beyond a single stage's contribution.",
            ratio
        ),
        metrics: evidence,
        mitigation_tags: vec![
            MitigationTag::BroadcastJoin,
            MitigationTag::FilterEarly,
            MitigationTag::OptimizeShuffle,
            MitigationTag::CacheData,
            MitigationTag::EnableAqe,
        ],
        mitigation_hint: "Review the overall job plan for repeated wide transformations; \
                           cache intermediate results and enable adaptive query execution."
            .to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
