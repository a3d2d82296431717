// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.
//!
//! Use `--json` with any `cinder` command to get this output.

use serde::Serialize;

use cinder_ast::SourceMap;

use crate::{Diagnostic, Severity};

/// A complete JSON diagnostic report for one run.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    pub file: String,
    /// Whether the run produced no errors.
    pub success: bool,
    /// The phase that produced these diagnostics.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// A single diagnostic in JSON form, enriched with source context.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A source location with line/column (1-based).
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Offset in the global offset space.
    pub offset: u32,
    pub length: u32,
    pub source_line: String,
}

/// Convert diagnostics to a structured JSON report.
pub fn to_json_report<'d>(
    diagnostics: impl IntoIterator<Item = &'d Diagnostic>,
    sources: &SourceMap,
    file: &str,
    phase: &str,
) -> DiagnosticReport {
    let mut error_count = 0;
    let mut warning_count = 0;

    let diagnostics: Vec<JsonDiagnostic> = diagnostics
        .into_iter()
        .map(|d| {
            match d.severity {
                Severity::Error => error_count += 1,
                Severity::Warning => warning_count += 1,
                Severity::Note => {}
            }
            to_json_diagnostic(d, sources)
        })
        .collect();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics,
        error_count,
        warning_count,
    }
}

fn to_json_diagnostic(diag: &Diagnostic, sources: &SourceMap) -> JsonDiagnostic {
    let location = sources.lookup(diag.span.start).map(|file| {
        let (line, column) = file.line_col(diag.span.start);
        SourceLocation {
            file: file.name.clone(),
            line,
            column,
            offset: diag.span.start,
            length: diag.span.length,
            source_line: file.line_text(line).unwrap_or("").to_string(),
        }
    });

    JsonDiagnostic {
        severity: diag.severity,
        code: diag.code.as_str(),
        category: diag.code.category().to_string(),
        message: diag.message.clone(),
        location,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Serialize a diagnostic report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;
    use cinder_ast::Span;

    #[test]
    fn report_counts_and_locates() {
        let mut sources = SourceMap::new();
        sources.add("a.cn", "x\n");
        sources.add("b.cn", "def y\n");
        let diags = vec![
            Diagnostic::new(Code::DefinitionMissingType, Span::new(7, 1), "missing type"),
            Diagnostic::new(Code::RedundantEmptyStatement, Span::new(0, 1), "empty statement"),
        ];
        let report = to_json_report(&diags, &sources, "b.cn", "parse");

        assert!(!report.success);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        let loc = report.diagnostics[0].location.as_ref().unwrap();
        assert_eq!((loc.file.as_str(), loc.line, loc.column), ("b.cn", 1, 5));
        assert_eq!(loc.source_line, "def y");

        let json = to_json_string(&report);
        assert!(json.contains("\"code\": \"E0105\""));
        assert!(json.contains("\"severity\": \"warning\""));
    }
}
