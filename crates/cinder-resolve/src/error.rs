// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution error types.

use cinder_ast::Span;
use cinder_diagnostics::{Code, Diagnostic, ToDiagnostic};
use thiserror::Error;

/// A name resolution error.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub span: Span,
}

impl ResolveError {
    pub fn unresolved(name: String, span: Span, suggestion: Option<String>) -> Self {
        Self {
            kind: ResolveErrorKind::UnresolvedName { name, suggestion },
            span,
        }
    }

    pub fn code(&self) -> Code {
        match self.kind {
            ResolveErrorKind::UnresolvedName { .. } => Code::UnresolvedName,
        }
    }
}

/// The kind of resolution error.
#[derive(Debug, Clone, Error)]
pub enum ResolveErrorKind {
    #[error("cannot find `{name}` in this scope")]
    UnresolvedName {
        name: String,
        /// A visible name close to `name`.
        suggestion: Option<String>,
    },
}

impl ToDiagnostic for ResolveError {
    fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), self.span, self.to_string());
        match &self.kind {
            ResolveErrorKind::UnresolvedName { suggestion: Some(help), .. } => diagnostic.with_help(help.clone()),
            ResolveErrorKind::UnresolvedName { suggestion: None, .. } => diagnostic,
        }
    }
}
