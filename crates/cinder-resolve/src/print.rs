// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Indented text rendering of a symbol tree.

use std::fmt::Write;

use cinder_ast::StringTable;

use crate::symbol::{Symbol, SymbolId, SymbolKind, SymbolTree};

/// Render `tree` with one symbol per line, e.g. `Variable x [0] @12`.
///
/// Declarations and scopes show their slot, lookups the declaration they
/// resolved to.
pub fn dump(tree: &SymbolTree, strings: &StringTable) -> String {
    let mut out = String::new();
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let symbol = tree.get(id);
        out.push_str(&"  ".repeat(depth));
        write_symbol(&mut out, tree, strings, symbol);
        out.push('\n');
        stack.extend(symbol.symbols.iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

fn write_symbol(out: &mut String, tree: &SymbolTree, strings: &StringTable, symbol: &Symbol) {
    let _ = write!(out, "{:?}", symbol.kind);
    if let Some(name) = symbol.name {
        let _ = write!(out, " {}", strings.lookup(name));
    }
    match symbol.kind {
        SymbolKind::Lookup => match tree.resolve(symbol.id) {
            Some(declaration) => {
                let _ = write!(out, " -> {:?} [{}]", declaration.kind, declaration.slot);
                if let Some(scope) = declaration.parent {
                    let _ = write!(out, " in {}", describe_scope(tree, scope));
                }
            }
            None => out.push_str(" (unresolved)"),
        },
        _ => {
            let _ = write!(out, " [{}]", symbol.slot);
        }
    }
    if !symbol.node.is_marker() {
        let _ = write!(out, " @{}", symbol.span.start);
    }
}

fn describe_scope(tree: &SymbolTree, scope: SymbolId) -> String {
    let symbol = tree.get(scope);
    if symbol.parent.is_none() {
        "root".to_string()
    } else {
        format!("{:?} @{}", symbol.kind, symbol.span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{build, BuildOptions};
    use cinder_parser::parse_source;

    #[test]
    fn dumps_nested_scopes() {
        let mut parsed = parse_source("test.cn", "def x = 1\n{ x; y }");
        let options = BuildOptions { prelude: false };
        let (mut tree, _) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        crate::bind(&mut tree, &parsed.strings);
        assert_eq!(
            dump(&tree, &parsed.strings),
            "Scope [0] @0\n  Definition x [0] @4\n  Scope [0] @10\n    Lookup x -> Definition [0] in root @12\n    Lookup y (unresolved) @15\n"
        );
    }
}
