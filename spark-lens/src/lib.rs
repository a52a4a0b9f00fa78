// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # spark-lens
//!
//! The application layer wrapping [`spark_lens_domain`] with the ambient
//! concerns a deployed instance of this system needs: layered configuration
//! loading, structured logging, a report envelope, and a narrow plug-in seam
//! for optional LLM-based explanations. No CLI, no renderer, and no concrete
//! LLM adapter live here — those are external collaborators that plug into
//! the seams this crate exposes.

pub mod analyze;
pub mod config;
pub mod error;
pub mod explain;
pub mod logging;
pub mod report;

pub use analyze::{analyze, analyze_reproducible};
pub use error::AnalysisError;
pub use explain::{Explainer, ExplainerRegistry, NoneExplainer};
pub use report::Report;

pub use spark_lens_domain as domain;
