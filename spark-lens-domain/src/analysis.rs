// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Analysis Entry Point
//!
//! Wires components A–F together: open the event log, aggregate it into
//! [`ApplicationMetrics`], run the detector registry, and hand back both —
//! the one place in the domain crate that knows about the whole pipeline
//! end to end.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::aggregator::Aggregator;
use crate::detectors;
use crate::error::SparkLensError;
use crate::finding::FindingCollection;
use crate::metrics::ApplicationMetrics;
use crate::reader::EventReader;
use crate::threshold::ThresholdConfig;

/// The result of analyzing one event log: its aggregated metrics and every
/// finding the detector registry produced from them.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub metrics: ApplicationMetrics,
    pub findings: FindingCollection,
}

/// Analyzes the event log at `path` with a process-local, non-deterministic
/// reservoir seed. Convenience wrapper over [`analyze_with_rng`] for callers
/// that do not need reproducible percentile estimates.
pub fn analyze(path: impl AsRef<Path>, thresholds: &ThresholdConfig) -> Result<AnalysisResult, SparkLensError> {
    let mut rng = StdRng::from_os_rng();
    analyze_with_rng(path, thresholds, &mut rng)
}

/// Analyzes the event log at `path`, drawing reservoir-sampling decisions
/// from `rng`. A fixed seed makes the resulting metrics and findings fully
/// reproducible (§5, §8's idempotence law).
pub fn analyze_with_rng(
    path: impl AsRef<Path>,
    thresholds: &ThresholdConfig,
    rng: &mut dyn rand::RngCore,
) -> Result<AnalysisResult, SparkLensError> {
    let reader = EventReader::open(path)?;
    let mut aggregator = Aggregator::new(rng);
    for event in reader {
        aggregator.apply(event?);
    }
    let metrics = aggregator.freeze();

    let mut findings = FindingCollection::new();
    findings.extend(detectors::run_all(&metrics, thresholds));

    Ok(AnalysisResult { metrics, findings })
}
