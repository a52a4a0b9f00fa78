// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Findings
//!
//! A [`Finding`] is the unit of output of a detector: a single detected
//! performance pattern with evidence, severity, affected stages, and
//! mitigation guidance. A [`FindingCollection`] is the unordered multiset of
//! findings produced by a full detector run, with query views over it
//! (component F, §4.5).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Canonical ordering rank: critical=0, warning=1, info=2.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// A member of the closed mitigation-tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MitigationTag {
    Repartition,
    Coalesce,
    BroadcastJoin,
    IncreaseMemory,
    IncreaseParallelism,
    ReduceParallelism,
    EnableAqe,
    CacheData,
    FilterEarly,
    Salting,
    OptimizeShuffle,
    CheckDataSource,
    ReduceCollect,
}

impl std::fmt::Display for MitigationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MitigationTag::Repartition => "repartition",
            MitigationTag::Coalesce => "coalesce",
            MitigationTag::BroadcastJoin => "broadcast-join",
            MitigationTag::IncreaseMemory => "increase-memory",
            MitigationTag::IncreaseParallelism => "increase-parallelism",
            MitigationTag::ReduceParallelism => "reduce-parallelism",
            MitigationTag::EnableAqe => "enable-aqe",
            MitigationTag::CacheData => "cache-data",
            MitigationTag::FilterEarly => "filter-early",
            MitigationTag::Salting => "salting",
            MitigationTag::OptimizeShuffle => "optimize-shuffle",
            MitigationTag::CheckDataSource => "check-data-source",
            MitigationTag::ReduceCollect => "reduce-collect",
        };
        f.write_str(s)
    }
}

/// A single detected performance pattern.
///
/// `metrics` carries the literal numeric evidence used to make the
/// detection decision — not the raw stage data — so a downstream consumer
/// (a renderer, an LLM explainer) never needs to re-read the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: String,
    pub detector: &'static str,
    pub title: String,
    pub severity: Severity,
    pub stage_ids: Vec<i64>,
    pub description: String,
    pub metrics: BTreeMap<String, f64>,
    pub mitigation_tags: Vec<MitigationTag>,
    pub mitigation_hint: String,
}

impl Finding {
    /// The reduced view handed to an [`crate::explain`]-style consumer: the
    /// same shape `to_summary_dict()` produces in the original
    /// implementation — every field except the raw `metrics` evidence map.
    pub fn to_llm_summary(&self) -> FindingSummary<'_> {
        FindingSummary {
            id: &self.id,
            detector: self.detector,
            title: &self.title,
            severity: self.severity,
            stage_ids: &self.stage_ids,
            description: &self.description,
            mitigation_tags: &self.mitigation_tags,
            mitigation_hint: &self.mitigation_hint,
        }
    }
}

/// Data-minimized view of a [`Finding`] suitable for handing to an external
/// explainer: no raw metrics evidence, only what a human (or LLM) needs to
/// explain the finding in prose.
#[derive(Debug, Clone, Serialize)]
pub struct FindingSummary<'a> {
    pub id: &'a str,
    pub detector: &'static str,
    pub title: &'a str,
    pub severity: Severity,
    pub stage_ids: &'a [i64],
    pub description: &'a str,
    pub mitigation_tags: &'a [MitigationTag],
    pub mitigation_hint: &'a str,
}

/// The unordered multiset of findings produced by a detector run, with
/// query views over it. Insertion appends; no deduplication by id is
/// enforced — callers (the detectors) are responsible for producing unique
/// ids.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FindingCollection {
    findings: Vec<Finding>,
}

impl FindingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    pub fn by_detector(&self, detector: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.detector == detector).collect()
    }

    pub fn by_stage(&self, stage_id: i64) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.stage_ids.contains(&stage_id))
            .collect()
    }

    pub fn critical(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Critical)
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Warning)
    }

    pub fn info(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Info)
    }

    /// Canonical display ordering: critical → warning → info, ties broken
    /// by original insertion order. `Vec::sort_by_key` is stable, which is
    /// exactly the tie-break this requires.
    pub fn sorted_by_severity(&self) -> Vec<&Finding> {
        let mut sorted: Vec<&Finding> = self.findings.iter().collect();
        sorted.sort_by_key(|f| f.severity.rank());
        sorted
    }
}

impl<'a> IntoIterator for &'a FindingCollection {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}
