// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Detector Framework
//!
//! Component D (§4.4): the common interface every detector implements, and
//! the fixed registry of six that ship. Each detector is a pure, stateless
//! function of `(metrics, thresholds)` — no detector depends on another's
//! output, and the registry's iteration order is the only thing that governs
//! insertion order into a [`crate::finding::FindingCollection`].

mod driver;
mod io;
mod partition;
mod shuffle;
mod skew;
mod spill;

use crate::finding::Finding;
use crate::metrics::ApplicationMetrics;
use crate::threshold::ThresholdConfig;

/// One independent analyzer over aggregated metrics.
pub trait Detector {
    /// Stable, lowercase identifier (e.g. `"skew"`), used by
    /// [`crate::finding::FindingCollection::by_detector`] and embedded as a
    /// prefix in each [`Finding::id`] it produces.
    fn name(&self) -> &'static str;

    /// Evaluates this detector against one application's metrics. Total:
    /// must never panic, and must return the same findings for the same
    /// inputs every time it is called.
    fn detect(&self, metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding>;
}

/// The fixed set of six detectors this system ships, in the order their
/// findings are inserted into a fresh [`crate::finding::FindingCollection`].
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(skew::SkewDetector),
        Box::new(shuffle::ShuffleExplosionDetector),
        Box::new(spill::SpillDetector),
        Box::new(partition::PartitionInefficiencyDetector),
        Box::new(io::IoDetector),
        Box::new(driver::DriverDetector),
    ]
}

/// Runs every registered detector over `metrics` and collects their findings
/// in registry order.
pub fn run_all(metrics: &ApplicationMetrics, thresholds: &ThresholdConfig) -> Vec<Finding> {
    all_detectors()
        .iter()
        .flat_map(|detector| detector.detect(metrics, thresholds))
        .collect()
}

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Converts a byte count to mebibytes for threshold comparison.
fn mib(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}
