// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Threshold Configuration
//!
//! Numeric parameters governing every detector (§4.3). A `ThresholdConfig`
//! is immutable once built and shared by value across all six detectors —
//! there is no mutation after construction, and nothing in the detector
//! pipeline holds a reference back into it.

use serde::{Deserialize, Serialize};

use crate::error::SparkLensError;

/// Validated, immutable detector thresholds.
///
/// Construct via [`ThresholdConfig::default`] for the published defaults, or
/// [`ThresholdConfigBuilder`] to override individual fields before a single
/// validation pass at [`ThresholdConfigBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    skew_ratio: f64,
    shuffle_explosion_ratio: f64,
    min_spill_mb: u64,
    min_tasks_for_inefficiency: u64,
    max_task_runtime_ms_for_inefficiency: u64,
    io_dominant_ratio: f64,
    max_result_size_mb: u64,
    max_scheduling_delay_ms: u64,
}

impl ThresholdConfig {
    pub const DEFAULT_SKEW_RATIO: f64 = 10.0;
    pub const DEFAULT_SHUFFLE_EXPLOSION_RATIO: f64 = 5.0;
    pub const DEFAULT_MIN_SPILL_MB: u64 = 100;
    pub const DEFAULT_MIN_TASKS_FOR_INEFFICIENCY: u64 = 200;
    pub const DEFAULT_MAX_TASK_RUNTIME_MS_FOR_INEFFICIENCY: u64 = 100;
    pub const DEFAULT_IO_DOMINANT_RATIO: f64 = 0.7;
    pub const DEFAULT_MAX_RESULT_SIZE_MB: u64 = 50;
    pub const DEFAULT_MAX_SCHEDULING_DELAY_MS: u64 = 1000;

    pub fn builder() -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::default()
    }

    /// Validates the invariants from §4.3: ratios strictly greater than 1.0
    /// where applicable, byte/ms thresholds non-negative (enforced by the
    /// unsigned field types themselves), and `io_dominant_ratio` in `[0, 1]`.
    pub fn validate(&self) -> Result<(), SparkLensError> {
        if self.skew_ratio <= 1.0 {
            return Err(SparkLensError::invalid_config(format!(
                "skew_ratio must be > 1.0, got {}",
                self.skew_ratio
            )));
        }
        if self.shuffle_explosion_ratio <= 1.0 {
            return Err(SparkLensError::invalid_config(format!(
                "shuffle_explosion_ratio must be > 1.0, got {}",
                self.shuffle_explosion_ratio
            )));
        }
        if self.min_tasks_for_inefficiency < 1 {
            return Err(SparkLensError::invalid_config(
                "min_tasks_for_inefficiency must be >= 1".to_string(),
            ));
        }
        if self.max_task_runtime_ms_for_inefficiency < 1 {
            return Err(SparkLensError::invalid_config(
                "max_task_runtime_ms_for_inefficiency must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.io_dominant_ratio) {
            return Err(SparkLensError::invalid_config(format!(
                "io_dominant_ratio must be in [0, 1], got {}",
                self.io_dominant_ratio
            )));
        }
        Ok(())
    }

    pub fn skew_ratio(&self) -> f64 {
        self.skew_ratio
    }

    pub fn shuffle_explosion_ratio(&self) -> f64 {
        self.shuffle_explosion_ratio
    }

    pub fn min_spill_mb(&self) -> u64 {
        self.min_spill_mb
    }

    pub fn min_tasks_for_inefficiency(&self) -> u64 {
        self.min_tasks_for_inefficiency
    }

    pub fn max_task_runtime_ms_for_inefficiency(&self) -> u64 {
        self.max_task_runtime_ms_for_inefficiency
    }

    pub fn io_dominant_ratio(&self) -> f64 {
        self.io_dominant_ratio
    }

    pub fn max_result_size_mb(&self) -> u64 {
        self.max_result_size_mb
    }

    pub fn max_scheduling_delay_ms(&self) -> u64 {
        self.max_scheduling_delay_ms
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            skew_ratio: Self::DEFAULT_SKEW_RATIO,
            shuffle_explosion_ratio: Self::DEFAULT_SHUFFLE_EXPLOSION_RATIO,
            min_spill_mb: Self::DEFAULT_MIN_SPILL_MB,
            min_tasks_for_inefficiency: Self::DEFAULT_MIN_TASKS_FOR_INEFFICIENCY,
            max_task_runtime_ms_for_inefficiency: Self::DEFAULT_MAX_TASK_RUNTIME_MS_FOR_INEFFICIENCY,
            io_dominant_ratio: Self::DEFAULT_IO_DOMINANT_RATIO,
            max_result_size_mb: Self::DEFAULT_MAX_RESULT_SIZE_MB,
            max_scheduling_delay_ms: Self::DEFAULT_MAX_SCHEDULING_DELAY_MS,
        }
    }
}

/// Builder for [`ThresholdConfig`], defaulting every field to the published
/// default and validating once at [`build`](Self::build).
#[derive(Debug, Clone, Copy)]
pub struct ThresholdConfigBuilder {
    inner: ThresholdConfig,
}

impl Default for ThresholdConfigBuilder {
    fn default() -> Self {
        Self {
            inner: ThresholdConfig::default(),
        }
    }
}

impl ThresholdConfigBuilder {
    pub fn skew_ratio(mut self, value: f64) -> Self {
        self.inner.skew_ratio = value;
        self
    }

    pub fn shuffle_explosion_ratio(mut self, value: f64) -> Self {
        self.inner.shuffle_explosion_ratio = value;
        self
    }

    pub fn min_spill_mb(mut self, value: u64) -> Self {
        self.inner.min_spill_mb = value;
        self
    }

    pub fn min_tasks_for_inefficiency(mut self, value: u64) -> Self {
        self.inner.min_tasks_for_inefficiency = value;
        self
    }

    pub fn max_task_runtime_ms_for_inefficiency(mut self, value: u64) -> Self {
        self.inner.max_task_runtime_ms_for_inefficiency = value;
        self
    }

    pub fn io_dominant_ratio(mut self, value: f64) -> Self {
        self.inner.io_dominant_ratio = value;
        self
    }

    pub fn max_result_size_mb(mut self, value: u64) -> Self {
        self.inner.max_result_size_mb = value;
        self
    }

    pub fn max_scheduling_delay_ms(mut self, value: u64) -> Self {
        self.inner.max_scheduling_delay_ms = value;
        self
    }

    pub fn build(self) -> Result<ThresholdConfig, SparkLensError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
