// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `cinder` binary. Each test runs a phase
//! command on a sample or a temporary file and checks exit status and
//! output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cinder(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cinder"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("CINDER_LOG")
        .output()
        .expect("failed to run cinder")
}

fn sample(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("samples")
        .join(name)
        .display()
        .to_string()
}

/// Write `source` to a file unique to `name` in the temp directory.
fn scratch(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cinder_cli_{}_{}.cn", name, std::process::id()));
    std::fs::write(&path, source).expect("failed to write scratch file");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn parse_sample_succeeds() {
    let out = cinder(&["parse", &sample("control.cn")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("(Module"));
    assert!(stdout(&out).contains("Parse OK"));
}

#[test]
fn scope_sample_succeeds() {
    let out = cinder(&["scope", &sample("basics.cn")]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Function"));
    assert!(stdout(&out).contains("Scope OK"));
}

#[test]
fn lex_prints_implied_terminators() {
    let path = scratch("lex", "a\nb\n");
    let out = cinder(&["lex", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Semi (implied)"));
}

#[test]
fn lex_reports_unrecognized_characters() {
    let path = scratch("lex_invalid", "a $ b\n");
    let out = cinder(&["lex", "--json", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let json = stdout(&out);
    assert!(json.contains("\"success\": false"), "stdout: {}", json);
    assert!(json.contains("\"code\": \"E0107\""), "stdout: {}", json);

    let out = cinder(&["lex", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unrecognized character `$`"), "stderr: {}", stderr(&out));
}

#[test]
fn parse_errors_exit_with_one() {
    let path = scratch("parse_error", "(1 2, 3)\n");
    let out = cinder(&["parse", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("E0102"), "stderr: {}", err);
    assert!(err.contains("Parse FAILED: 1 error"), "stderr: {}", err);
}

#[test]
fn json_reports_diagnostics() {
    let path = scratch("json", "def x\n");
    let out = cinder(&["parse", "--json", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let json = stdout(&out);
    assert!(json.contains("\"success\": false"), "stdout: {}", json);
    assert!(json.contains("\"code\": \"E0105\""), "stdout: {}", json);
    assert!(json.contains("\"phase\": \"parse\""), "stdout: {}", json);
}

#[test]
fn unresolved_names_fail_the_scope_command() {
    let path = scratch("scope_error", "def count = 1\ncout\n");
    let out = cinder(&["scope", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("E0200"), "stderr: {}", err);
    assert!(err.contains("did you mean `count`?"), "stderr: {}", err);
}

#[test]
fn explain_known_and_unknown_codes() {
    let out = cinder(&["explain", "e0106"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("E0106"));

    let out = cinder(&["explain", "E9999"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn version_and_help() {
    let out = cinder(&["version"]);
    assert!(out.status.success());
    assert!(stdout(&out).starts_with("cinder "));

    let out = cinder(&["help"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("scope"));
}
