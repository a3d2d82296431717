// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Binding lookups to declarations.

use std::collections::HashMap;

use tracing::{debug, trace};

use cinder_ast::{Key, StringTable};
use cinder_diagnostics::suggestions::did_you_mean;

use crate::error::ResolveError;
use crate::symbol::{SymbolId, SymbolKind, SymbolTree};

/// Resolve every lookup of `tree`.
///
/// The innermost scope declaring the name wins. Within that scope the
/// latest declaration before the lookup wins, or else the earliest one
/// after it. Lookups that reach the root unresolved are returned as errors.
pub fn bind(tree: &mut SymbolTree, strings: &StringTable) -> Vec<ResolveError> {
    // Named declarations per (scope, name), in scope order
    let mut declared: HashMap<(SymbolId, Key), Vec<SymbolId>> = HashMap::new();
    let mut lookups = Vec::new();
    for symbol in tree.iter() {
        match (symbol.kind, symbol.name, symbol.parent) {
            (SymbolKind::Definition | SymbolKind::Variable, Some(name), Some(scope)) => {
                declared.entry((scope, name)).or_default().push(symbol.id);
            }
            (SymbolKind::Lookup, Some(name), Some(_)) => lookups.push((symbol.id, name)),
            _ => {}
        }
    }

    let mut errors = Vec::new();
    for &(lookup, name) in &lookups {
        match find(tree, &declared, lookup, name) {
            Some(declaration) => {
                trace!(lookup = lookup.0, declaration = declaration.0, "bound lookup");
                tree.get_mut(lookup).binding = Some(declaration);
            }
            None => {
                let text = strings.lookup(name);
                let candidates = visible(tree, lookup)
                    .into_iter()
                    .map(|key| strings.lookup(key));
                let suggestion = did_you_mean(text, candidates);
                errors.push(ResolveError::unresolved(text.to_string(), tree.get(lookup).span, suggestion));
            }
        }
    }

    debug!(lookups = lookups.len(), unresolved = errors.len(), "bound lookups");
    errors
}

fn find(
    tree: &SymbolTree,
    declared: &HashMap<(SymbolId, Key), Vec<SymbolId>>,
    lookup: SymbolId,
    name: Key,
) -> Option<SymbolId> {
    let mut child = lookup;
    let mut scope = tree.get(lookup).parent;
    while let Some(current) = scope {
        if let Some(candidates) = declared.get(&(current, name)) {
            let position = tree.get(child).order;
            let before = candidates.partition_point(|&id| tree.get(id).order < position);
            let index = before.saturating_sub(1);
            return candidates.get(index).copied();
        }
        child = current;
        scope = tree.get(current).parent;
    }
    None
}

/// Names declared in every scope enclosing `lookup`.
fn visible(tree: &SymbolTree, lookup: SymbolId) -> Vec<Key> {
    let mut names = Vec::new();
    let mut scope = tree.get(lookup).parent;
    while let Some(current) = scope {
        for name in tree.declarations(current).filter_map(|symbol| symbol.name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        scope = tree.get(current).parent;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{build, BuildOptions};
    use cinder_parser::parse_source;

    /// Slot of the declaration each lookup resolved to, by name, in
    /// lookup order.
    fn bindings(source: &str) -> Vec<(String, Option<(SymbolKind, u32)>)> {
        let mut parsed = parse_source("test.cn", source);
        assert!(parsed.reporter.is_empty(), "{:?}", parsed.reporter.diagnostics());
        let (mut tree, _) = build(&parsed.ast, &mut parsed.strings, parsed.root, BuildOptions::default());
        bind(&mut tree, &parsed.strings);
        tree.iter()
            .filter(|symbol| symbol.kind == SymbolKind::Lookup)
            .map(|symbol| {
                let name = symbol.name.map(|key| parsed.strings.lookup(key).to_string()).unwrap_or_default();
                let target = tree.resolve(symbol.id).map(|decl| (decl.kind, decl.slot));
                (name, target)
            })
            .collect()
    }

    #[test]
    fn innermost_declaration_wins() {
        let found = bindings("def x = 1\n{\n  x : int = 2\n  x\n}\nx");
        let xs: Vec<_> = found.into_iter().filter(|(name, _)| name == "x").collect();
        assert_eq!(
            xs,
            vec![
                ("x".to_string(), Some((SymbolKind::Variable, 0))),
                ("x".to_string(), Some((SymbolKind::Definition, 0))),
            ]
        );
    }

    #[test]
    fn latest_earlier_declaration_wins_within_a_scope() {
        let mut parsed = parse_source("test.cn", "def a = 1\ndef a = 2\na\ndef a = 3");
        let (mut tree, module) = build(&parsed.ast, &mut parsed.strings, parsed.root, BuildOptions::default());
        assert!(bind(&mut tree, &parsed.strings).is_empty());

        let a = tree
            .get(module)
            .symbols
            .iter()
            .map(|&id| tree.get(id))
            .find(|s| s.kind == SymbolKind::Lookup)
            .expect("lookup of a");
        assert_eq!(tree.resolve(a.id).map(|d| d.slot), Some(1));
    }

    #[test]
    fn forward_references_bind_to_the_earliest_declaration() {
        let found = bindings("f\ndef f = 1\ndef f = 2");
        assert_eq!(found, vec![("f".to_string(), Some((SymbolKind::Definition, 0)))]);
    }

    #[test]
    fn definitions_can_refer_to_themselves() {
        let found = bindings("def loop_forever = () -> loop_forever()");
        assert_eq!(found, vec![("loop_forever".to_string(), Some((SymbolKind::Definition, 0)))]);
    }

    #[test]
    fn prelude_names_resolve() {
        let found = bindings("x : int = 1");
        assert_eq!(found, vec![("int".to_string(), Some((SymbolKind::Definition, 0)))]);
    }

    #[test]
    fn unresolved_names_suggest_visible_ones() {
        let mut parsed = parse_source("test.cn", "def count = 1\n{ cout }");
        let (mut tree, _) = build(&parsed.ast, &mut parsed.strings, parsed.root, BuildOptions::default());
        let errors = bind(&mut tree, &parsed.strings);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "cannot find `cout` in this scope");
        match &errors[0].kind {
            crate::ResolveErrorKind::UnresolvedName { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("did you mean `count`?"));
            }
        }
        assert_eq!(tree.unresolved().count(), 1);
    }
}
