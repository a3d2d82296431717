// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

// === Phase Banners ===

pub fn section(title: &str) -> String {
    format!("{} {} {}", "===".dimmed(), title, "===".dimmed())
}

/// Closing line of a successful phase, noting any warnings.
pub fn banner_ok(phase: &str, warnings: usize) -> String {
    let msg = match warnings {
        0 => format!("{} OK", phase),
        1 => format!("{} OK, 1 warning", phase),
        n => format!("{} OK, {} warnings", phase, n),
    };
    format!("{} {} {}", "===".dimmed(), msg.green().bold(), "===".dimmed())
}

pub fn banner_fail(phase: &str, errors: usize) -> String {
    let noun = if errors == 1 { "error" } else { "errors" };
    let msg = format!("{} FAILED: {} {}", phase, errors, noun);
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

// === Help Output ===

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn version(v: &str) -> ColoredString {
    v.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

pub fn code(code: &str) -> ColoredString {
    code.red().bold()
}

pub fn dim(text: &str) -> ColoredString {
    text.dimmed()
}
