// /////////////////////////////////////////////////////////////////////////////
// Spark Lens
// Copyright (c) 2026 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Explainer Plug-in Seam
//!
//! Design Note 9's "narrow capability": an [`Explainer`] turns a finding's
//! data-minimized [`FindingSummary`] into prose, and an [`ExplainerRegistry`]
//! resolves one by name at startup. Only [`NoneExplainer`] is linked into
//! this crate — concrete LLM-backed adapters (Anthropic, OpenAI, Ollama) are
//! the named external-collaborator Non-goal and live outside this workspace.
//!
//! Per §6/§7, an explainer never propagates a failure as an error: whatever
//! goes wrong is caught by the implementation and folded into the returned
//! string.

use std::collections::HashMap;

use spark_lens_domain::finding::FindingSummary;

/// Turns finding evidence into human-readable prose. Implementations must
/// not panic and must not propagate errors — a failure becomes part of the
/// returned string.
pub trait Explainer: Send + Sync {
    /// Explains a single finding.
    fn explain_finding(&self, summary: &FindingSummary<'_>) -> String;

    /// Summarizes a whole analysis run's findings.
    fn summarize(&self, summaries: &[FindingSummary<'_>]) -> String;
}

/// The no-op explainer: the `--llm none` default. Produces empty
/// explanations without making any external call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoneExplainer;

impl Explainer for NoneExplainer {
    fn explain_finding(&self, _summary: &FindingSummary<'_>) -> String {
        String::new()
    }

    fn summarize(&self, _summaries: &[FindingSummary<'_>]) -> String {
        String::new()
    }
}

type ExplainerFactory = Box<dyn Fn() -> Box<dyn Explainer> + Send + Sync>;

/// A process-local, name-keyed registry of [`Explainer`] factories.
/// Concrete LLM adapters are expected to register themselves here from
/// outside this crate; only `"none"` is registered by [`ExplainerRegistry::with_defaults`].
pub struct ExplainerRegistry {
    factories: HashMap<String, ExplainerFactory>,
}

impl ExplainerRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry pre-populated with the one built-in adapter, `"none"`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("none", || Box::new(NoneExplainer));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, factory: impl Fn() -> Box<dyn Explainer> + Send + Sync + 'static) {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Instantiates the explainer registered under `name`, or `None` if no
    /// adapter with that name was registered.
    pub fn create(&self, name: &str) -> Option<Box<dyn Explainer>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

impl Default for ExplainerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_explainer_produces_empty_output() {
        let explainer = NoneExplainer;
        let summary = FindingSummary {
            id: "skew-stage-1",
            detector: "skew",
            title: "t",
            severity: spark_lens_domain::Severity::Warning,
            stage_ids: &[1],
            description: "d",
            mitigation_tags: &[],
            mitigation_hint: "h",
        };
        assert_eq!(explainer.explain_finding(&summary), "");
        assert_eq!(explainer.summarize(&[summary]), "");
    }

    #[test]
    fn default_registry_resolves_none() {
        let registry = ExplainerRegistry::with_defaults();
        assert!(registry.create("none").is_some());
        assert!(registry.create("anthropic").is_none());
    }

    #[test]
    fn custom_adapters_can_be_registered() {
        let mut registry = ExplainerRegistry::new();
        registry.register("none", || Box::new(NoneExplainer));
        assert_eq!(registry.names(), vec!["none"]);
    }
}
