// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error Module
//!
//! The domain only ever fails in two ways: the event log cannot be opened or
//! read, or an injected [`crate::threshold::ThresholdConfig`] violates its own
//! invariants. Every other anomaly described in the specification — a
//! malformed line, a missing field, an out-of-order event — is recoverable
//! and silent by design, and therefore has no corresponding error variant
//! here.

use thiserror::Error;

/// Errors that can escape the domain layer.
#[derive(Error, Debug, Clone)]
pub enum SparkLensError {
    /// The event log could not be opened or read. Never raised for content
    /// errors — those are skipped per line.
    #[error("event log I/O error: {0}")]
    Io(String),

    /// A [`crate::threshold::ThresholdConfig`] value failed validation.
    #[error("invalid threshold configuration: {0}")]
    InvalidConfiguration(String),
}

impl SparkLensError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Whether a caller might reasonably retry after this error.
    ///
    /// I/O errors against a log file at rest are not expected to be
    /// transient; this is here for symmetry with the application layer's
    /// error type, which does have retryable variants (e.g. explainer
    /// network failures).
    pub fn is_recoverable(&self) -> bool {
        false
    }
}

impl From<std::io::Error> for SparkLensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
