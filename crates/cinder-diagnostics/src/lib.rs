// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Cinder front-end diagnostics.
//!
//! Every phase reports into a [`Reporter`] owned by the compilation
//! session. Phase-specific error types are converted to [`Diagnostic`] via
//! the [`ToDiagnostic`] trait, so the CLI only ever renders one type.

pub mod codes;
pub mod formatter;
pub mod json;
pub mod suggestions;

use std::fmt;

use cinder_ast::Span;
use serde::Serialize;

pub use codes::{Category, Code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic anchored at one span of the global offset space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{severity}[{code}]: {message}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    pub span: Span,
    pub message: String,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

impl Diagnostic {
    /// A diagnostic with the code's default severity.
    pub fn new(code: Code, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            span,
            message: message.into(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Convert a phase error into a diagnostic.
pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}

/// Position in a [`Reporter`] to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Collects diagnostics in report order.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic for `code` at `span`. The returned reference
    /// lets the caller attach help or notes.
    pub fn report(&mut self, code: Code, span: Span, message: impl Into<String>) -> &mut Diagnostic {
        self.push(Diagnostic::new(code, span, message));
        let last = self.diagnostics.len() - 1;
        &mut self.diagnostics[last]
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.diagnostics.len())
    }

    /// Drop every diagnostic reported since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        for dropped in self.diagnostics.drain(checkpoint.0..) {
            match dropped.severity {
                Severity::Error => self.errors -= 1,
                Severity::Warning => self.warnings -= 1,
                Severity::Note => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let mut reporter = Reporter::new();
        reporter.report(Code::TokenExpectMismatch, Span::new(0, 1), "expected ';'");
        reporter.report(Code::RedundantEmptyStatement, Span::new(3, 1), "empty statement");
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 1);
        assert!(reporter.has_errors());
    }

    #[test]
    fn report_returns_diagnostic_for_help() {
        let mut reporter = Reporter::new();
        reporter.report(Code::UnboundElse, Span::new(0, 4), "dangling else").help =
            Some("remove the `else`".to_string());
        assert_eq!(reporter.diagnostics()[0].help.as_deref(), Some("remove the `else`"));
    }

    #[test]
    fn rollback_restores_counts() {
        let mut reporter = Reporter::new();
        reporter.report(Code::TokenExpectMismatch, Span::new(0, 1), "first");
        let checkpoint = reporter.checkpoint();
        reporter.report(Code::TokenCannotStartExpression, Span::new(2, 1), "second");
        reporter.report(Code::RedundantEmptyStatement, Span::new(4, 1), "third");
        reporter.rollback(checkpoint);
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(reporter.warning_count(), 0);
    }

    #[test]
    fn display() {
        let diag = Diagnostic::new(Code::UnresolvedName, Span::new(0, 1), "cannot find `x`");
        assert_eq!(diag.to_string(), "error[E0200]: cannot find `x`");
    }
}
