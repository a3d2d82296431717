// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Cinder CLI: run the front-end phases on a file and show the result.

mod commands;
mod help;
mod output;

use std::env;
use std::process;

use cinder_diagnostics::Code;
use cinder_parser::ParseOptions;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

/// Options shared by the phase commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub format: Format,
    pub parse: ParseOptions,
    pub prelude: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: Format::Human,
            parse: ParseOptions::default(),
            prelude: true,
        }
    }
}

fn main() {
    output::init();
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let (positional, options) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}: {}", output::error_label(), message);
            process::exit(2);
        }
    };

    let Some(command) = positional.first() else {
        help::print_usage();
        return;
    };
    debug!(command = command.as_str(), ?options, "running");

    let ok = match command.as_str() {
        "lex" | "parse" | "scope" => {
            let Some(path) = positional.get(1) else {
                eprintln!("Usage: cinder {} <file.cn>", command);
                process::exit(2);
            };
            match command.as_str() {
                "lex" => commands::phase::cmd_lex(path, options),
                "parse" => commands::phase::cmd_parse(path, options),
                _ => commands::phase::cmd_scope(path, options),
            }
        }
        "explain" => match positional.get(1) {
            Some(text) => match text.parse::<Code>() {
                Ok(code) => {
                    help::explain(Some(code));
                    true
                }
                Err(e) => {
                    eprintln!("{}: {}", output::error_label(), e);
                    false
                }
            },
            None => {
                help::explain(None);
                true
            }
        },
        "help" => {
            help::print_usage();
            true
        }
        "version" => {
            println!("cinder {}", help::VERSION);
            true
        }
        other if other.ends_with(".cn") => commands::phase::cmd_parse(other, options),
        other => {
            eprintln!("{}: unknown command: {}", output::error_label(), other);
            help::print_usage();
            process::exit(2);
        }
    };

    if !ok {
        process::exit(1);
    }
}

/// Log to stderr, filtered by `CINDER_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CINDER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Split `args` into positional arguments and options.
fn parse_args(args: &[String]) -> Result<(Vec<String>, Options), String> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => options.format = Format::Json,
            "--no-prelude" => options.prelude = false,
            "--max-errors" => {
                let value = iter.next().ok_or("--max-errors needs a value")?;
                options.parse.max_errors = value
                    .parse()
                    .map_err(|_| format!("invalid error limit: {}", value))?;
            }
            "--help" | "-h" => positional.push("help".to_string()),
            "--version" | "-V" => positional.push("version".to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option: {}", flag)),
            _ => positional.push(arg.clone()),
        }
    }

    Ok((positional, options))
}
