// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Error Module
//!
//! `AnalysisError` wraps [`SparkLensError`] and extends it with the
//! application layer's own failure modes: configuration-file loading.
//! Explainer failures are deliberately *not* a variant here — per §6/§7 they
//! are contained at the explainer boundary and surface as a returned string,
//! never as a propagated error.

use thiserror::Error;

use spark_lens_domain::SparkLensError;

/// Errors that can escape the application layer.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A failure from the domain core: event log I/O or invalid thresholds.
    #[error(transparent)]
    Domain(#[from] SparkLensError),

    /// The layered configuration (defaults/file/env) could not be loaded or
    /// deserialized into a [`spark_lens_domain::ThresholdConfig`].
    #[error("failed to load configuration: {0}")]
    Configuration(String),
}

impl AnalysisError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
