// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the Cinder language.
//!
//! This crate holds the data shared by every front-end phase: spans and
//! source files, the string table, tokens, and the pooled node arena the
//! parser builds into.

pub mod arena;
pub mod intern;
pub mod node;
pub mod print;
pub mod source;
pub mod span;
pub mod token;

pub use arena::{Ast, SequenceBuffer, SIZE_CLASSES};
pub use intern::{Key, StringTable};
pub use node::{Node, NodeId, NodeKind, Payload};
pub use source::{SourceFile, SourceId, SourceMap};
pub use span::{LineMap, Span};
