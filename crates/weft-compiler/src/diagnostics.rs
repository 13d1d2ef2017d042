//! Diagnostic collection for rule compilation.
//!
//! `load()` and `compile()` never propagate errors to the caller; everything
//! lands here as a severity-tagged message. Warnings (such as unresolved
//! forward references) do not flip the success flag.

use std::fmt;

/// Severity of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single collected message, optionally pinned to a source position.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{tag} on line {line} column {column}: {}", self.message)
            }
            _ => write!(f, "{tag}: {}", self.message),
        }
    }
}

/// Ordered collector of diagnostics.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error without a source position.
    pub fn error(&mut self, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line: None,
            column: None,
        });
    }

    /// Record an error at a 1-based line/column.
    pub fn error_at(&mut self, message: impl Into<String>, line: u32, column: u32) {
        self.items.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line: Some(line),
            column: Some(column),
        });
    }

    /// Record a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            line: None,
            column: None,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}
