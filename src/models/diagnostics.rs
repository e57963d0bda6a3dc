//! Diagnostics returned by reconcilers and data sources

use serde::{Deserialize, Serialize};

use crate::utils::error::ProviderError;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single user-visible message attached to an operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short summary, e.g. "certificate revoked"
    pub summary: String,
    /// Longer explanation
    pub detail: String,
}

impl Diagnostic {
    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    /// Record a provider error under the given summary
    pub fn add_provider_error(&mut self, summary: impl Into<String>, err: &ProviderError) {
        let detail = match err {
            // Bare messages read better for local failures
            ProviderError::PolicyViolation(detail) => detail.clone(),
            ProviderError::NotConfigured => "missing client".to_string(),
            other => other.to_string(),
        };
        self.add_error(summary, detail);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Outcome of a reconcile or data source read
///
/// `state` is the value the orchestrator should track afterwards. `None`
/// means the entity is gone (removed remotely, destroyed, or never created).
/// When `diagnostics.has_error()` the orchestrator must not persist `state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateResponse<T> {
    pub state: Option<T>,
    pub diagnostics: Diagnostics,
}

impl<T> StateResponse<T> {
    pub fn set(state: T) -> Self {
        Self {
            state: Some(state),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn removed() -> Self {
        Self {
            state: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// A failed operation with a single error diagnostic
    pub fn failed(summary: impl Into<String>, err: &ProviderError) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_provider_error(summary, err);
        Self {
            state: None,
            diagnostics,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}
