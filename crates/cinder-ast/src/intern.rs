// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! String interning.

use indexmap::IndexSet;

/// Interned string handle. Equal text always yields an equal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key(u32);

impl Key {
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw value for storing a key in a 64-bit node payload.
    pub const fn to_raw(self) -> u64 {
        self.0 as u64
    }

    pub const fn from_raw(raw: u64) -> Self {
        Key(raw as u32)
    }
}

/// Append-only interner shared by the lexer and parser of one compilation.
#[derive(Debug, Default)]
pub struct StringTable {
    strings: IndexSet<Box<str>>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing key if it was seen before.
    pub fn intern(&mut self, text: &str) -> Key {
        if let Some(index) = self.strings.get_index_of(text) {
            return Key(index as u32);
        }
        let (index, _) = self.strings.insert_full(text.into());
        Key(index as u32)
    }

    /// Key of already-interned text, without inserting.
    pub fn get(&self, text: &str) -> Option<Key> {
        self.strings.get_index_of(text).map(|i| Key(i as u32))
    }

    /// Text of an interned key.
    ///
    /// Keys are only minted by this table, so an unknown key is a bug.
    pub fn lookup(&self, key: Key) -> &str {
        match self.strings.get_index(key.index()) {
            Some(text) => text,
            None => panic!("key {:?} was not interned by this table", key),
        }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
