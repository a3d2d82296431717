// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Symbol definitions and the symbol tree.

use cinder_ast::{Key, NodeId, Span};

/// Unique identifier for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A nested lexical scope: block, sequence, `if` or `loop`.
    Scope,
    /// A function scope. Parameters and body statements live in it directly.
    Function,
    /// A `def` or a `name = value` member.
    Definition,
    /// A `name: type` binding or member.
    Variable,
    /// A name reference, bound to a declaration by [`crate::bind`].
    Lookup,
    /// A sequence member with no name. Occupies a slot for positional use.
    Unknown,
}

impl SymbolKind {
    pub fn is_scope(self) -> bool {
        matches!(self, SymbolKind::Scope | SymbolKind::Function)
    }

    /// Declarations share one slot sequence per scope.
    pub fn is_declaration(self) -> bool {
        matches!(self, SymbolKind::Definition | SymbolKind::Variable | SymbolKind::Unknown)
    }
}

/// A node of the symbol tree.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    /// Ordinal among the parent scope's symbols of the same family:
    /// declarations, lookups or nested scopes.
    pub slot: u32,
    /// Position among all of the parent scope's symbols.
    pub order: u32,
    pub parent: Option<SymbolId>,
    /// Declared or referenced name.
    pub name: Option<Key>,
    /// The AST node this symbol was built from; `NodeId::NONE` for
    /// predeclared names.
    pub node: NodeId,
    pub span: Span,
    /// Children of a scope, in encounter order.
    pub symbols: Vec<SymbolId>,
    /// The declaration a lookup resolved to.
    pub binding: Option<SymbolId>,
}

/// Slot counters of one scope.
#[derive(Debug, Clone, Copy, Default)]
struct Slots {
    declarations: u32,
    lookups: u32,
    scopes: u32,
}

/// The tree of scopes and symbols of one module.
#[derive(Debug)]
pub struct SymbolTree {
    symbols: Vec<Symbol>,
    slots: Vec<Slots>,
    root: SymbolId,
}

impl SymbolTree {
    /// Create a tree holding only its root scope.
    pub fn new(node: NodeId, span: Span) -> Self {
        let root = Symbol {
            id: SymbolId(0),
            kind: SymbolKind::Scope,
            slot: 0,
            order: 0,
            parent: None,
            name: None,
            node,
            span,
            symbols: Vec::new(),
            binding: None,
        };
        Self {
            symbols: vec![root],
            slots: vec![Slots::default()],
            root: SymbolId(0),
        }
    }

    pub fn root(&self) -> SymbolId {
        self.root
    }

    /// Append a symbol to `parent` and assign its slot.
    pub fn insert(
        &mut self,
        parent: SymbolId,
        kind: SymbolKind,
        name: Option<Key>,
        node: NodeId,
        span: Span,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let counters = &mut self.slots[parent.index()];
        let counter = if kind.is_declaration() {
            &mut counters.declarations
        } else if kind.is_scope() {
            &mut counters.scopes
        } else {
            &mut counters.lookups
        };
        let slot = *counter;
        *counter += 1;

        let order = self.symbols[parent.index()].symbols.len() as u32;
        self.symbols[parent.index()].symbols.push(id);
        self.symbols.push(Symbol {
            id,
            kind,
            slot,
            order,
            parent: Some(parent),
            name,
            node,
            span,
            symbols: Vec::new(),
            binding: None,
        });
        self.slots.push(Slots::default());
        id
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Declarations of `scope` in slot order.
    pub fn declarations(&self, scope: SymbolId) -> impl Iterator<Item = &Symbol> {
        self.get(scope)
            .symbols
            .iter()
            .map(|&id| self.get(id))
            .filter(|symbol| symbol.kind.is_declaration())
    }

    /// Lookups that did not resolve.
    pub fn unresolved(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind == SymbolKind::Lookup && symbol.binding.is_none())
    }

    /// The declaration `lookup` is bound to, if any.
    pub fn resolve(&self, lookup: SymbolId) -> Option<&Symbol> {
        self.get(lookup).binding.map(|id| self.get(id))
    }
}
