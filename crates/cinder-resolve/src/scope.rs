// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scope building: one walk over a parsed module that creates the symbol
//! tree. Names are only recorded here; [`crate::bind`] resolves them.

use tracing::debug;

use cinder_ast::{Ast, NodeId, NodeKind, Span, StringTable};

use crate::symbol::{SymbolId, SymbolKind, SymbolTree};

/// Names declared in the prelude scope, in slot order.
pub const PRELUDE: [&str; 4] = ["int", "char", "string", "bool"];

/// Scope building options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Wrap the module scope in a scope declaring [`PRELUDE`].
    pub prelude: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { prelude: true }
    }
}

/// Build the symbol tree of the module at `root`.
///
/// Returns the tree and the scope symbol of the module itself, which is the
/// tree root unless a prelude was requested.
pub fn build(ast: &Ast, strings: &mut StringTable, root: NodeId, options: BuildOptions) -> (SymbolTree, SymbolId) {
    let span = ast.span(root);
    let (tree, module) = if options.prelude {
        let mut tree = SymbolTree::new(NodeId::NONE, Span::default());
        let prelude = tree.root();
        for name in PRELUDE {
            let key = strings.intern(name);
            tree.insert(prelude, SymbolKind::Definition, Some(key), NodeId::NONE, Span::default());
        }
        let module = tree.insert(prelude, SymbolKind::Scope, None, root, span);
        (tree, module)
    } else {
        let tree = SymbolTree::new(root, span);
        let module = tree.root();
        (tree, module)
    };

    let mut builder = ScopeBuilder { ast, tree, scope: module };
    builder.statements(root);
    debug!(symbols = builder.tree.len(), "built scope tree");
    (builder.tree, module)
}

struct ScopeBuilder<'a> {
    ast: &'a Ast,
    tree: SymbolTree,
    scope: SymbolId,
}

impl<'a> ScopeBuilder<'a> {
    fn visit(&mut self, id: NodeId) {
        if id.is_marker() {
            return;
        }
        match self.ast.kind(id) {
            NodeKind::Name => {
                let name = self.ast.key(id);
                self.tree.insert(self.scope, SymbolKind::Lookup, name, id, self.ast.span(id));
            }
            NodeKind::Definition => self.declare(SymbolKind::Definition, id),
            NodeKind::Variable => self.declare(SymbolKind::Variable, id),
            NodeKind::Block | NodeKind::If | NodeKind::Loop => {
                self.scoped(SymbolKind::Scope, id, |builder| builder.statements(id));
            }
            NodeKind::List | NodeKind::TypeList => {
                self.scoped(SymbolKind::Scope, id, |builder| builder.members(id, false));
            }
            NodeKind::Function => self.function(id),
            // The identifier after `.` or `::` selects, it does not refer
            NodeKind::Field | NodeKind::Path => {
                let target = self.ast.children(id)[0];
                self.visit(target);
            }
            _ => self.statements(id),
        }
    }

    /// Visit every child of `id` in the current scope.
    fn statements(&mut self, id: NodeId) {
        for &child in self.ast.children(id) {
            self.visit(child);
        }
    }

    /// Visit the members of a sequence. Every member takes a declaration
    /// slot; members without a name are `Unknown`. With `bare_names`, a lone
    /// name declares a parameter of inferred type, as in `(x) -> x + 1`.
    fn members(&mut self, id: NodeId, bare_names: bool) {
        for &member in self.ast.children(id) {
            match self.ast.kind(member) {
                NodeKind::Definition | NodeKind::Variable => self.visit(member),
                NodeKind::Name if bare_names => {
                    let name = self.ast.key(member);
                    let span = self.ast.span(member);
                    self.tree.insert(self.scope, SymbolKind::Variable, name, member, span);
                }
                _ => {
                    let span = if member.is_marker() {
                        self.ast.span(id)
                    } else {
                        self.ast.span(member)
                    };
                    self.tree.insert(self.scope, SymbolKind::Unknown, None, member, span);
                    self.visit(member);
                }
            }
        }
    }

    /// `[identifier, type, value]`: the name is declared before its type
    /// and value are visited, so a definition can refer to itself.
    fn declare(&mut self, kind: SymbolKind, id: NodeId) {
        let children = self.ast.children(id);
        let (ident, ty, value) = (children[0], children[1], children[2]);
        let name = if ident.is_marker() { None } else { self.ast.key(ident) };
        let (kind, span) = match name {
            Some(_) => (kind, self.ast.span(ident)),
            None => (SymbolKind::Unknown, self.ast.span(id)),
        };
        self.tree.insert(self.scope, kind, name, id, span);
        self.visit(ty);
        self.visit(value);
    }

    /// Parameters and a block body share the function's one scope.
    fn function(&mut self, id: NodeId) {
        let children = self.ast.children(id);
        let (params, result, body) = (children[0], children[1], children[2]);
        self.scoped(SymbolKind::Function, id, |builder| {
            match builder.ast.kind(params) {
                NodeKind::List => builder.members(params, true),
                NodeKind::TypeList => builder.members(params, false),
                _ => builder.visit(params),
            }
            builder.visit(result);
            if builder.ast.kind(body) == NodeKind::Block {
                builder.statements(body);
            } else {
                builder.visit(body);
            }
        });
    }

    fn scoped(&mut self, kind: SymbolKind, id: NodeId, f: impl FnOnce(&mut Self)) {
        let outer = self.scope;
        self.scope = self.tree.insert(outer, kind, None, id, self.ast.span(id));
        f(self);
        self.scope = outer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_parser::parse_source;

    fn kinds(tree: &SymbolTree, scope: SymbolId) -> Vec<SymbolKind> {
        tree.get(scope).symbols.iter().map(|&id| tree.get(id).kind).collect()
    }

    #[test]
    fn prelude_wraps_the_module() {
        let mut parsed = parse_source("test.cn", "a");
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, BuildOptions::default());
        let prelude = tree.root();
        assert_eq!(tree.declarations(prelude).count(), PRELUDE.len());
        assert_eq!(tree.get(module).parent, Some(prelude));
        assert_eq!(tree.get(module).node, parsed.root);
        assert_eq!(kinds(&tree, module), vec![SymbolKind::Lookup]);
    }

    #[test]
    fn without_prelude_the_module_is_the_root() {
        let mut parsed = parse_source("test.cn", "def x = 1");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        assert_eq!(module, tree.root());
        assert_eq!(kinds(&tree, module), vec![SymbolKind::Definition]);
    }

    #[test]
    fn nesting_constructs_push_scopes() {
        let mut parsed = parse_source("test.cn", "if a { b } else c\nloop d\n[e]");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        assert_eq!(kinds(&tree, module), vec![SymbolKind::Scope, SymbolKind::Scope, SymbolKind::Scope]);

        let if_scope = tree.get(module).symbols[0];
        assert_eq!(kinds(&tree, if_scope), vec![SymbolKind::Lookup, SymbolKind::Scope, SymbolKind::Lookup]);

        let list_scope = tree.get(module).symbols[2];
        assert_eq!(kinds(&tree, list_scope), vec![SymbolKind::Unknown, SymbolKind::Lookup]);
    }

    #[test]
    fn sequence_members_take_slots_in_order() {
        let mut parsed = parse_source("test.cn", "(a = 1, 2, b: int)");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        let list = tree.get(module).symbols[0];
        let slots: Vec<_> = tree.declarations(list).map(|s| (s.kind, s.slot)).collect();
        assert_eq!(
            slots,
            vec![
                (SymbolKind::Definition, 0),
                (SymbolKind::Unknown, 1),
                (SymbolKind::Variable, 2),
            ]
        );
    }

    #[test]
    fn selectors_are_not_lookups() {
        let mut parsed = parse_source("test.cn", "a.b\nstd::io");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        let names: Vec<_> = tree
            .get(module)
            .symbols
            .iter()
            .filter_map(|&id| tree.get(id).name)
            .map(|key| parsed.strings.lookup(key).to_string())
            .collect();
        assert_eq!(names, vec!["a", "std"]);
    }

    #[test]
    fn function_parameters_share_the_body_scope() {
        let mut parsed = parse_source("test.cn", "def f = (x: int) -> int {\n  y : int = x\n  y\n}");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        // def f, then its value: the function scope
        assert_eq!(kinds(&tree, module), vec![SymbolKind::Definition, SymbolKind::Function]);

        let function = tree.get(module).symbols[1];
        assert_eq!(
            kinds(&tree, function),
            vec![
                SymbolKind::Variable, // x
                SymbolKind::Lookup,   // int in x's type
                SymbolKind::Lookup,   // result type
                SymbolKind::Variable, // y
                SymbolKind::Lookup,   // int
                SymbolKind::Lookup,   // x
                SymbolKind::Lookup,   // y
            ]
        );
        let slots: Vec<_> = tree.declarations(function).map(|s| s.slot).collect();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn bare_parameter_names_are_declarations() {
        let mut parsed = parse_source("test.cn", "def inc = (x, 2) -> x + 1");
        let options = BuildOptions { prelude: false };
        let (tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, options);
        let function = tree.get(module).symbols[1];
        assert_eq!(
            kinds(&tree, function),
            vec![
                SymbolKind::Variable, // x
                SymbolKind::Unknown,  // 2
                SymbolKind::Lookup,   // x
            ]
        );
        let slots: Vec<_> = tree.declarations(function).map(|s| s.slot).collect();
        assert_eq!(slots, vec![0, 1]);
    }
}
