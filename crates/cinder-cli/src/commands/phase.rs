// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Phase inspection commands: lex, parse, scope.

use std::fs;

use cinder_ast::token::{TokenKind, TokenValue};
use cinder_ast::{print, SourceMap, StringTable};
use cinder_diagnostics::formatter::DiagnosticFormatter;
use cinder_diagnostics::json::{to_json_report, to_json_string};
use cinder_diagnostics::{Code, Diagnostic, ToDiagnostic};
use cinder_lexer::{KeywordTable, Lexer};
use cinder_parser::{parse_source_with, Parsed};
use cinder_resolve::{resolve, BuildOptions};

use crate::{output, Format, Options};

fn read_source(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            None
        }
    }
}

/// Print `diagnostics` to stderr, or as a JSON report to stdout.
fn show_diagnostics(diagnostics: &[Diagnostic], sources: &SourceMap, path: &str, phase: &str, format: Format) {
    match format {
        Format::Human => {
            if !diagnostics.is_empty() {
                eprint!("{}", DiagnosticFormatter::new(sources).format_all(diagnostics));
            }
        }
        Format::Json => {
            let report = to_json_report(diagnostics, sources, path, phase);
            println!("{}", to_json_string(&report));
        }
    }
}

pub fn cmd_lex(path: &str, options: Options) -> bool {
    let Some(source) = read_source(path) else {
        return false;
    };

    let mut sources = SourceMap::new();
    let id = sources.add(path, source);
    let mut strings = StringTable::new();
    let keywords = KeywordTable::new(&mut strings);
    let tokens = Lexer::for_file(sources.get(id), &keywords).tokenize(Some(TokenKind::Semi), &mut strings);
    let diagnostics: Vec<Diagnostic> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Invalid)
        .map(|t| {
            let text = sources.get(id).slice(t.span).unwrap_or_default();
            let message = format!("unrecognized character `{}`", text);
            Diagnostic::new(Code::InvalidCharacter, t.span, message)
        })
        .collect();
    let invalid = diagnostics.len();

    if options.format == Format::Human {
        println!("{}\n", output::section(&format!("Tokens ({})", tokens.len())));
        for token in &tokens {
            let value = match token.value {
                TokenValue::Key(key) => format!(" {:?}", strings.lookup(key)),
                TokenValue::Int(value) => format!(" {}", value),
                TokenValue::None => String::new(),
            };
            let implied = if token.implied { " (implied)" } else { "" };
            println!("{:5}:{:<3} {:?}{}{}", token.span.start, token.span.length, token.kind, value, implied);
        }
        println!();
    }
    show_diagnostics(&diagnostics, &sources, path, "lex", options.format);

    if options.format == Format::Human {
        if invalid == 0 {
            println!("{}", output::banner_ok("Lex", 0));
        } else {
            eprintln!("\n{}", output::banner_fail("Lex", invalid));
        }
    }

    invalid == 0
}

/// Parse `path`, printing parse diagnostics. `None` if the file is unreadable.
fn parse_file(path: &str, options: Options) -> Option<Parsed> {
    let source = read_source(path)?;
    Some(parse_source_with(path, source, options.parse))
}

pub fn cmd_parse(path: &str, options: Options) -> bool {
    let Some(parsed) = parse_file(path, options) else {
        return false;
    };

    if options.format == Format::Human {
        println!("{}\n", output::section(&format!("AST ({} statements)", parsed.statements().len())));
        print!("{}", print::tree(&parsed.ast, &parsed.strings, parsed.root));
        println!();
    }
    show_diagnostics(parsed.reporter.diagnostics(), &parsed.sources, path, "parse", options.format);

    let errors = parsed.reporter.error_count();
    if options.format == Format::Human {
        if errors == 0 {
            println!("{}", output::banner_ok("Parse", parsed.reporter.warning_count()));
        } else {
            eprintln!("\n{}", output::banner_fail("Parse", errors));
        }
    }
    errors == 0
}

pub fn cmd_scope(path: &str, options: Options) -> bool {
    let Some(mut parsed) = parse_file(path, options) else {
        return false;
    };

    if parsed.reporter.has_errors() {
        show_diagnostics(parsed.reporter.diagnostics(), &parsed.sources, path, "parse", options.format);
        if options.format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Parse", parsed.reporter.error_count()));
        }
        return false;
    }

    let build = BuildOptions { prelude: options.prelude };
    let resolved = resolve(&parsed.ast, &mut parsed.strings, parsed.root, build);

    let mut diagnostics = parsed.reporter.into_diagnostics();
    diagnostics.extend(resolved.errors.iter().map(|e| e.to_diagnostic()));

    if options.format == Format::Human {
        println!("{}\n", output::section(&format!("Symbols ({})", resolved.tree.len())));
        print!("{}", cinder_resolve::dump(&resolved.tree, &parsed.strings));
        println!();
    }
    show_diagnostics(&diagnostics, &parsed.sources, path, "scope", options.format);

    let errors = resolved.errors.len();
    if options.format == Format::Human {
        if errors == 0 {
            println!("{}", output::banner_ok("Scope", diagnostics.iter().filter(|d| !d.is_error()).count()));
        } else {
            eprintln!("\n{}", output::banner_fail("Scope", errors));
        }
    }
    errors == 0
}
