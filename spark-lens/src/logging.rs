// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tracing Initialization
//!
//! A thin `tracing-subscriber` bootstrap in the style of
//! `adaptive_pipeline_bootstrap::logger`: one function, called once at
//! process startup by whatever external CLI or service embeds this crate.
//! The domain crate never calls into this module or `tracing` directly.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber that honors `RUST_LOG`, falling
/// back to `info` when the environment variable is unset or unparsable.
///
/// Returns an error if a global subscriber is already installed; callers
/// that embed this crate inside a larger application with its own tracing
/// setup should skip calling this and rely on their own initialization
/// instead.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
