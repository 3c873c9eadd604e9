use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal problem found while resolving a schema or emitting code.
///
/// Diagnostics never stop a run. Each one names the entity it concerns and
/// what was done instead (skipped, defaulted, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// The entity the diagnostic is about, e.g. `Users` or `Users.group_id`.
    pub entity: String,

    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The entity was left out of an emitter's output.
    Skipped,

    /// A value could not be recognized and a default was used instead.
    Defaulted,

    /// A reference points at something the schema does not declare.
    Dangling,
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn skipped(entity: impl Into<String>, reason: impl Into<String>) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Skipped, entity, reason)
    }

    pub fn defaulted(entity: impl Into<String>, reason: impl Into<String>) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Defaulted, entity, reason)
    }

    pub fn dangling(entity: impl Into<String>, reason: impl Into<String>) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::Dangling, entity, reason)
    }

    fn new(
        kind: DiagnosticKind,
        entity: impl Into<String>,
        reason: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic {
            kind,
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`: {}", self.kind, self.entity, self.reason)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::Skipped => "skipped",
            DiagnosticKind::Defaulted => "defaulted",
            DiagnosticKind::Dangling => "dangling",
        })
    }
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    /// Records a diagnostic and logs it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            entity = %diagnostic.entity,
            "{}",
            diagnostic.reason
        );
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagnostic> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Diagnostics about `entity`.
    pub fn about<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items.iter().filter(move |d| d.entity == entity)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
