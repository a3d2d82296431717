// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! S-expression rendering of AST subtrees, for dumps and tests.

use std::fmt::Write;

use crate::arena::Ast;
use crate::intern::{Key, StringTable};
use crate::node::{NodeId, NodeKind};

/// Render `root` on one line, e.g. `(Add (Integer 1) (Name x))`.
pub fn sexpr(ast: &Ast, strings: &StringTable, root: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, ast, strings, root, None);
    out
}

/// Render `root` with one node per line, children indented by two spaces.
pub fn tree(ast: &Ast, strings: &StringTable, root: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, ast, strings, root, Some(0));
    out.push('\n');
    out
}

fn write_node(out: &mut String, ast: &Ast, strings: &StringTable, id: NodeId, indent: Option<usize>) {
    let node = ast.get(id);
    let kind = node.kind;
    let children = node.children();

    if let Some(value) = node.scalar() {
        let _ = match kind {
            NodeKind::Char => match char::from_u32(value as u32) {
                Some(c) => write!(out, "(Char {:?})", c),
                None => write!(out, "(Char {})", value),
            },
            NodeKind::String => write!(out, "(String {:?})", strings.lookup(Key::from_raw(value))),
            NodeKind::Name | NodeKind::Identifier => {
                write!(out, "({:?} {})", kind, strings.lookup(Key::from_raw(value)))
            }
            _ => write!(out, "({:?} {})", kind, value),
        };
        return;
    }

    if children.is_empty() && !matches!(kind, NodeKind::Module | NodeKind::Block | NodeKind::List | NodeKind::TypeList) {
        let _ = write!(out, "{:?}", kind);
        return;
    }

    let _ = write!(out, "({:?}", kind);
    for &child in children {
        match indent {
            Some(depth) => {
                out.push('\n');
                out.push_str(&"  ".repeat(depth + 1));
                write_node(out, ast, strings, child, Some(depth + 1));
            }
            None => {
                out.push(' ');
                write_node(out, ast, strings, child, None);
            }
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn renders_nested_nodes() {
        let mut ast = Ast::new();
        let mut strings = StringTable::new();
        let x = strings.intern("x");
        let one = ast.scalar(NodeKind::Integer, Span::new(0, 1), 1);
        let name = ast.named(NodeKind::Name, Span::new(4, 1), x);
        let add = ast.binary(NodeKind::Add, Span::new(0, 5), one, name);
        let ret = ast.unary(NodeKind::Return, Span::new(0, 5), NodeId::NONE);

        assert_eq!(sexpr(&ast, &strings, add), "(Add (Integer 1) (Name x))");
        assert_eq!(sexpr(&ast, &strings, ret), "(Return None)");
        assert_eq!(tree(&ast, &strings, add), "(Add\n  (Integer 1)\n  (Name x))\n");
    }

    #[test]
    fn empty_sequences_keep_parens() {
        let mut ast = Ast::new();
        let strings = StringTable::new();
        let list = ast.many(NodeKind::List, Span::new(0, 2), &[]);
        assert_eq!(sexpr(&ast, &strings, list), "(List)");
    }
}
