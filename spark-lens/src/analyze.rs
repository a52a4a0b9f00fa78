// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application-Level Analysis
//!
//! The one function an embedding CLI or service calls: analyze an event log
//! on disk and get back a [`Report`] ready to serialize or render. Wraps
//! [`spark_lens_domain::analyze_with_rng`] with tracing spans, matching
//! `adaptive_pipeline`'s pattern of instrumenting the domain's entry points
//! from the application layer rather than from the domain itself.

use std::path::Path;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::instrument;

use spark_lens_domain::{analyze_with_rng, ThresholdConfig};

use crate::error::AnalysisError;
use crate::report::Report;

/// Analyzes the event log at `path` against `thresholds` and returns a
/// ready-to-serialize [`Report`]. Uses a process-local, non-deterministic
/// reservoir seed; see [`analyze_reproducible`] for deterministic runs.
#[instrument(skip(thresholds), fields(source_path = %path.as_ref().display()))]
pub fn analyze(path: impl AsRef<Path>, thresholds: &ThresholdConfig) -> Result<Report, AnalysisError> {
    let mut rng = StdRng::from_os_rng();
    analyze_reproducible(path, thresholds, &mut rng)
}

/// Analyzes the event log at `path`, drawing reservoir-sampling decisions
/// from `rng`. A fixed seed makes the resulting report fully reproducible.
#[instrument(skip(thresholds, rng), fields(source_path = %path.as_ref().display()))]
pub fn analyze_reproducible(
    path: impl AsRef<Path>,
    thresholds: &ThresholdConfig,
    rng: &mut dyn rand::RngCore,
) -> Result<Report, AnalysisError> {
    let path = path.as_ref();
    tracing::debug!("starting analysis");

    let result = analyze_with_rng(path, thresholds, rng)?;
    tracing::info!(
        stages = result.metrics.num_stages(),
        findings = result.findings.len(),
        "analysis complete"
    );

    Ok(Report::new(
        path.to_string_lossy().into_owned(),
        result.metrics,
        &result.findings,
        Utc::now(),
    ))
}
