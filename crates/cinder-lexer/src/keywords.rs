// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Keyword recognition by interned key.

use std::collections::HashMap;

use cinder_ast::token::TokenKind;
use cinder_ast::{Key, StringTable};

const KEYWORDS: [(&str, TokenKind); 7] = [
    ("def", TokenKind::Def),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("loop", TokenKind::Loop),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("return", TokenKind::Return),
];

/// Maps the interned keys of keywords to their token kinds.
///
/// Built once per string table before lexing starts and immutable after.
#[derive(Debug)]
pub struct KeywordTable {
    kinds: HashMap<Key, TokenKind>,
}

impl KeywordTable {
    pub fn new(strings: &mut StringTable) -> Self {
        let kinds = KEYWORDS
            .iter()
            .map(|&(text, kind)| (strings.intern(text), kind))
            .collect();
        Self { kinds }
    }

    pub fn lookup(&self, key: Key) -> Option<TokenKind> {
        self.kinds.get(&key).copied()
    }
}
