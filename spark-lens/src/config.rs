// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Threshold Configuration Loading
//!
//! Layers a [`ThresholdConfig`] the same way the teacher's infrastructure
//! config modules build up runtime configuration: published defaults first,
//! an optional TOML file next, then environment variables (prefixed
//! `SPARK_LENS_`) taking final precedence. The domain's own
//! [`ThresholdConfig::validate`] is the single source of truth for whether
//! the result is usable — this module only assembles the layers.

use std::path::Path;

use config::{Config, Environment, File};

use spark_lens_domain::ThresholdConfig;

use crate::error::AnalysisError;

/// Loads detector thresholds from defaults, an optional TOML file at
/// `config_path`, and environment overrides, validating the result before
/// returning it.
pub fn load_thresholds(config_path: Option<&Path>) -> Result<ThresholdConfig, AnalysisError> {
    let defaults = ThresholdConfig::default();

    let mut builder = Config::builder()
        .set_default("skew_ratio", defaults.skew_ratio())?
        .set_default("shuffle_explosion_ratio", defaults.shuffle_explosion_ratio())?
        .set_default("min_spill_mb", defaults.min_spill_mb() as i64)?
        .set_default("min_tasks_for_inefficiency", defaults.min_tasks_for_inefficiency() as i64)?
        .set_default(
            "max_task_runtime_ms_for_inefficiency",
            defaults.max_task_runtime_ms_for_inefficiency() as i64,
        )?
        .set_default("io_dominant_ratio", defaults.io_dominant_ratio())?
        .set_default("max_result_size_mb", defaults.max_result_size_mb() as i64)?
        .set_default("max_scheduling_delay_ms", defaults.max_scheduling_delay_ms() as i64)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder = builder.add_source(Environment::with_prefix("SPARK_LENS"));

    let thresholds: ThresholdConfig = builder.build()?.try_deserialize()?;
    thresholds.validate()?;
    Ok(thresholds)
}
