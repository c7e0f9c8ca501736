//! User-facing warnings collected during a run.
//!
//! Diagnostics are never control flow. Extraction keeps going and the
//! collected items are reported after the run, grouped by kind.

use crate::history::HistoryEntry;
use crate::snapshot::DocumentSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of a [`Diagnostic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `@param` names no argument of its function
    UnmatchedParam,
    /// The function's signature changed in the most recent version
    SignatureChanged,
    /// A documented symbol has no description
    MissingDescription,
    /// A function's computed group name is empty
    EmptyGroup,
    /// A header failed to parse and was left out of its snapshot
    SkippedFile,
    /// A whole version failed and has no snapshot
    FailedVersion,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnmatchedParam => "unmatched @param",
            Self::SignatureChanged => "signature changed",
            Self::MissingDescription => "missing description",
            Self::EmptyGroup => "empty group",
            Self::SkippedFile => "skipped file",
            Self::FailedVersion => "failed version",
        };
        f.write_str(label)
    }
}

/// One warning about one symbol, file or version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category of the warning
    pub kind: DiagnosticKind,
    /// Function, type, file or version the warning is about
    pub symbol: String,
    /// Human-readable details
    pub message: String,
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, kind: DiagnosticKind, symbol: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic {
            kind,
            symbol: symbol.into(),
            message: message.into(),
        });
    }

    /// Append every diagnostic of `other`
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing was reported
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Diagnostics in the order they were reported
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of a single kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    /// Diagnostics grouped by kind, kinds in declaration order
    pub fn by_kind(&self) -> BTreeMap<DiagnosticKind, Vec<&Diagnostic>> {
        let mut grouped: BTreeMap<DiagnosticKind, Vec<&Diagnostic>> = BTreeMap::new();
        for item in &self.items {
            grouped.entry(item.kind).or_default().push(item);
        }
        grouped
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, items) in self.by_kind() {
            writeln!(f, "{kind} ({}):", items.len())?;
            for item in items {
                writeln!(f, "  {}: {}", item.symbol, item.message)?;
            }
        }
        Ok(())
    }
}

/// Warnings about the most recent snapshot of a project
///
/// Reports unmatched `@param` tags, symbols without a description and
/// functions whose signature changed in `latest_version`.
pub fn check_snapshot(
    snapshot: &DocumentSnapshot,
    history: &BTreeMap<String, HistoryEntry>,
    latest_version: &str,
) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    for (name, function) in snapshot.functions.iter().chain(&snapshot.callbacks) {
        for param in &function.unmatched_params {
            diagnostics.push(
                DiagnosticKind::UnmatchedParam,
                name,
                format!("@param {param} does not match any argument"),
            );
        }
        if function.description.is_empty() {
            diagnostics.push(
                DiagnosticKind::MissingDescription,
                name,
                format!("function in {} has no description", function.location.file),
            );
        }
    }

    for (name, entry) in &snapshot.types {
        if entry.decl.description().is_empty() {
            diagnostics.push(
                DiagnosticKind::MissingDescription,
                name,
                format!("{} in {} has no description", entry.decl.kind(), entry.decl.location().file),
            );
        }
    }

    for (name, entry) in history {
        if snapshot.functions.contains_key(name)
            && entry.changed_at.iter().any(|v| v == latest_version)
        {
            diagnostics.push(
                DiagnosticKind::SignatureChanged,
                name,
                format!("signature changed in {latest_version}"),
            );
        }
    }

    diagnostics
}
