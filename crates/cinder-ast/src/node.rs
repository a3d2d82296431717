// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! AST node types.

use crate::Span;

/// Handle to a node owned by an [`Ast`](crate::Ast).
///
/// The first three handles name the marker singletons; they are the same
/// in every arena and are never allocated or freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Absent optional part.
    pub const NONE: NodeId = NodeId(0);
    /// Malformed part that could not be parsed.
    pub const INVALID: NodeId = NodeId(1);
    /// Type left for inference.
    pub const INFERRED: NodeId = NodeId(2);

    pub(crate) const MARKER_COUNT: u32 = 3;

    pub const fn is_marker(self) -> bool {
        self.0 < Self::MARKER_COUNT
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// The kind of a node. The comment on each group gives its payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Markers; also allocated `Invalid` nodes holding salvaged children
    None,
    Invalid,
    Inferred,

    // Scalar payload
    /// Integer literal value.
    Integer,
    /// Code point of a char literal.
    Char,
    /// Interned contents of a string literal.
    String,
    /// Reference to a name, resolved by scope building.
    Name,
    /// A name that declares or selects rather than refers: the bound name of
    /// a definition, variable or member, or the field after `.`.
    Identifier,

    // No payload
    Break,
    Continue,

    // One child
    Negate,
    Not,
    /// Child is the returned value or `None`.
    Return,
    /// Child is the body statement.
    Loop,

    // Two children
    Assign,
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    /// `[callee, arguments list]`
    Call,
    /// `[target, index list]`
    Index,
    /// `[target, identifier]`
    Field,
    /// `[qualifier, identifier]`
    Path,
    /// `[value, count]` from the `expr .. count` member form.
    Repeat,

    // Child sequence
    Module,
    Block,
    /// Value sequence `( ... )` or `[ ... ]`.
    List,
    /// Type sequence `( ... )` or `[ ... ]`.
    TypeList,
    /// `[identifier, type, value]` from `def`.
    Definition,
    /// `[identifier, type, value]` from `name: type = value`.
    Variable,
    /// `[parameters, return type, body]`
    Function,
    /// `[condition, body, else branch]`
    If,
}

impl NodeKind {
    pub fn is_binary(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Assign | Or | And | Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
                | Add | Subtract | Multiply | Divide | Modulo | Power | Call | Index | Field
                | Path | Repeat
        )
    }

    /// Kinds whose payload is an interned key.
    pub fn carries_key(self) -> bool {
        matches!(self, NodeKind::String | NodeKind::Name | NodeKind::Identifier)
    }
}

/// Node payload, shaped by the node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Empty,
    Scalar(u64),
    Single(NodeId),
    Pair([NodeId; 2]),
    Many(Box<[NodeId]>),
}

/// A node record as stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub payload: Payload,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        match &self.payload {
            Payload::Empty | Payload::Scalar(_) => &[],
            Payload::Single(child) => std::slice::from_ref(child),
            Payload::Pair(pair) => pair,
            Payload::Many(children) => children,
        }
    }

    pub fn scalar(&self) -> Option<u64> {
        match self.payload {
            Payload::Scalar(value) => Some(value),
            _ => None,
        }
    }
}
