// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Cinder language.
//!
//! Scans one token at a time on demand of the parser, inserting implied
//! statement terminators at line ends.

mod keywords;
mod lexer;

pub use keywords::KeywordTable;
pub use lexer::{Cursor, Lexer};
