// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use cinder_diagnostics::Code;

use crate::output;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_usage() {
    println!(
        "{} {} - front end for the Cinder language",
        output::title("Cinder"),
        output::version(VERSION)
    );
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("cinder"),
        output::arg("<command>"),
        output::arg("[options]"),
        output::arg("[args]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}       Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}     Parse a file and print the syntax tree", output::command("parse"), output::arg("<file>"));
    println!("  {} {}     Build and bind scopes, print the symbol tree", output::command("scope"), output::arg("<file>"));
    println!("  {} {}   Explain a diagnostic code", output::command("explain"), output::arg("[code]"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}             Print diagnostics as JSON", output::arg("--json"));
    println!("  {}   Stop parsing after n errors (default 20)", output::arg("--max-errors <n>"));
    println!("  {}      Do not predeclare int, char, string, bool", output::arg("--no-prelude"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}           Log filter, e.g. debug or cinder_parser=trace", output::arg("CINDER_LOG"));
    println!("  {}   Disable or force colored output", output::arg("NO_COLOR, FORCE_COLOR"));
}

/// Print the explanation of `code`, or every code when none is given.
pub fn explain(code: Option<Code>) {
    match code {
        Some(code) => {
            println!("{}: {}", output::code(code.as_str()), output::title(code.title()));
            println!();
            println!("{}", code.explanation());
        }
        None => {
            println!("{}", output::section_header("Diagnostic codes:"));
            for code in Code::ALL {
                println!(
                    "  {}  {} {}",
                    output::code(code.as_str()),
                    code.title(),
                    output::dim(&format!("({})", code.severity()))
                );
            }
        }
    }
}
