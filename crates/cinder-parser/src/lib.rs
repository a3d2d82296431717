// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Cinder language.
//!
//! Pulls tokens from the lexer on demand and builds the module tree in an
//! [`Ast`] arena. Errors are reported to a [`Reporter`]; the parser always
//! returns a module node.

mod expr;
mod hints;
mod parser;
mod rules;
mod sequence;

use cinder_ast::{Ast, NodeId, SourceFile, SourceId, SourceMap, StringTable};
use cinder_diagnostics::Reporter;
use cinder_lexer::{KeywordTable, Lexer};

pub use parser::{ParseOptions, Parser};
pub use rules::{Assoc, Grammar, InfixForm, InfixRule, Precedence, PrefixForm};

/// Parse one file into a `Module` node of `ast`.
pub fn parse_module(
    file: &SourceFile,
    keywords: &KeywordTable,
    ast: &mut Ast,
    strings: &mut StringTable,
    reporter: &mut Reporter,
    options: ParseOptions,
) -> NodeId {
    let lexer = Lexer::for_file(file, keywords);
    Parser::new(lexer, ast, strings, reporter, options).parse_module()
}

/// A parsed file together with everything its tree refers to.
#[derive(Debug)]
pub struct Parsed {
    pub sources: SourceMap,
    pub source: SourceId,
    pub strings: StringTable,
    pub ast: Ast,
    pub root: NodeId,
    pub reporter: Reporter,
}

impl Parsed {
    pub fn file(&self) -> &SourceFile {
        self.sources.get(self.source)
    }

    /// Top-level statements of the module.
    pub fn statements(&self) -> &[NodeId] {
        self.ast.children(self.root)
    }

    pub fn sexpr(&self, id: NodeId) -> String {
        cinder_ast::print::sexpr(&self.ast, &self.strings, id)
    }
}

/// Parse `text` as a standalone file with default options.
pub fn parse_source(name: impl Into<String>, text: impl Into<String>) -> Parsed {
    parse_source_with(name, text, ParseOptions::default())
}

pub fn parse_source_with(name: impl Into<String>, text: impl Into<String>, options: ParseOptions) -> Parsed {
    let mut sources = SourceMap::new();
    let source = sources.add(name, text);
    let mut strings = StringTable::new();
    let keywords = KeywordTable::new(&mut strings);
    let mut ast = Ast::new();
    let mut reporter = Reporter::new();
    let root = parse_module(sources.get(source), &keywords, &mut ast, &mut strings, &mut reporter, options);
    Parsed { sources, source, strings, ast, root, reporter }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_samples() {
        let samples_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent().unwrap()
            .parent().unwrap()
            .join("samples");

        let mut parsed_any = false;
        for entry in std::fs::read_dir(&samples_dir).expect("samples directory not found") {
            let path = entry.unwrap().path();
            if path.extension().map(|e| e == "cn").unwrap_or(false) {
                let src = std::fs::read_to_string(&path)
                    .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));
                let parsed = parse_source(path.display().to_string(), src);
                assert!(
                    parsed.reporter.is_empty(),
                    "Diagnostics in {}: {:?}",
                    path.display(),
                    parsed.reporter.diagnostics()
                );
                parsed_any = true;
            }
        }
        assert!(parsed_any, "no samples found in {}", samples_dir.display());
    }

    #[test]
    fn empty_source_is_an_empty_module() {
        let parsed = parse_source("empty.cn", "");
        assert!(parsed.statements().is_empty());
        assert!(parsed.reporter.is_empty());
        assert_eq!(parsed.sexpr(parsed.root), "(Module)");
    }
}
