// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[E0102]: expected ',' between sequence members, found a number
//!   --> main.cn:3:12
//!    |
//!  3 |     (1 2, 3)
//!    |        ^ expected ','
//!    |
//!    = help: separate members with commas
//! ```

use colored::Colorize;

use cinder_ast::{SourceFile, SourceMap};

use crate::{Diagnostic, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let Some(file) = self.sources.lookup(diagnostic.span.start) else {
            self.format_footer(&mut out, diagnostic, 2);
            return out;
        };

        let (line, col) = file.line_col(diagnostic.span.start);
        let gutter_width = line.to_string().len().max(2);

        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file.name, line, col));
        out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));

        let text = file.line_text(line).unwrap_or("");
        out.push_str(&format!(
            "{:>width$} {} {}\n",
            line.to_string().blue().bold(),
            "|".blue(),
            text,
            width = gutter_width + 1,
        ));

        let underline = underline(file, diagnostic, line, col, text);
        let underline = match diagnostic.severity {
            Severity::Error => underline.red().bold(),
            Severity::Warning => underline.yellow().bold(),
            Severity::Note => underline.blue(),
        };
        out.push_str(&format!(
            "{} {} {}{}\n",
            " ".repeat(gutter_width + 1),
            "|".blue(),
            " ".repeat(col.saturating_sub(1) as usize),
            underline,
        ));

        if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
            out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        }
        self.format_footer(&mut out, diagnostic, gutter_width);
        out
    }

    /// Format every diagnostic, separated by blank lines.
    pub fn format_all<'d>(&self, diagnostics: impl IntoIterator<Item = &'d Diagnostic>) -> String {
        diagnostics
            .into_iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };
        let code = match diagnostic.severity {
            Severity::Error => diagnostic.code.as_str().red().bold(),
            _ => diagnostic.code.as_str().yellow().bold(),
        };
        out.push_str(&format!("{}[{}]: {}\n", severity, code, diagnostic.message.bold()));
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter_width: usize) {
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter_width + 1),
                "=".cyan(),
                "note".cyan().bold(),
                note
            ));
        }
        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter_width + 1),
                "=".cyan(),
                "help".cyan().bold(),
                help
            ));
        }
    }
}

/// Carets under the span, clipped to the first line. Zero-length spans
/// (implied terminators, end of input) still get one caret.
fn underline(file: &SourceFile, diagnostic: &Diagnostic, line: u32, col: u32, text: &str) -> String {
    let (end_line, end_col) = file.line_col(diagnostic.span.end());
    let end_col = if end_line == line { end_col } else { text.chars().count() as u32 + 1 };
    let width = end_col.saturating_sub(col).max(1) as usize;
    "^".repeat(width)
}
