// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source files laid out in one global offset space.

use crate::span::{LineMap, Span};

/// Index of a file inside a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

/// One source text and where it starts in the global offset space.
#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
    pub global_offset: u32,
    line_map: LineMap,
}

impl SourceFile {
    /// A standalone file starting at global offset `global_offset`.
    pub fn new(name: impl Into<String>, text: impl Into<String>, global_offset: u32) -> Self {
        let text = text.into();
        let line_map = LineMap::new(&text);
        Self { name: name.into(), text, global_offset, line_map }
    }

    /// One past the last global offset owned by this file.
    pub fn global_end(&self) -> u32 {
        self.global_offset + self.text.len() as u32
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.global_offset && offset <= self.global_end()
    }

    /// (line, col) of a global offset, both 1-based.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let local = offset.saturating_sub(self.global_offset).min(self.text.len() as u32);
        self.line_map.offset_to_line_col(local)
    }

    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.line_map.line_text(&self.text, line)
    }

    /// Source text covered by a global span, if it lies in this file.
    pub fn slice(&self, span: Span) -> Option<&str> {
        let start = span.start.checked_sub(self.global_offset)? as usize;
        self.text.get(start..start + span.length as usize)
    }
}

/// All files of one compilation, concatenated into one offset range.
///
/// Each file is followed by one unused offset so that the end-of-input
/// position of a file never coincides with the start of the next.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    next_offset: u32,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>) -> SourceId {
        let id = SourceId(self.files.len() as u32);
        let file = SourceFile::new(name, text, self.next_offset);
        self.next_offset = file.global_end() + 1;
        self.files.push(file);
        id
    }

    pub fn get(&self, id: SourceId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    /// The file owning a global offset.
    pub fn lookup(&self, offset: u32) -> Option<&SourceFile> {
        let idx = self.files.partition_point(|f| f.global_offset <= offset);
        let file = self.files.get(idx.checked_sub(1)?)?;
        file.contains(offset).then_some(file)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_do_not_overlap() {
        let mut map = SourceMap::new();
        let a = map.add("a.cn", "abc");
        let b = map.add("b.cn", "de\nf");
        assert_eq!(map.get(a).global_offset, 0);
        assert_eq!(map.get(b).global_offset, 4);

        assert_eq!(map.lookup(1).map(|f| f.name.as_str()), Some("a.cn"));
        assert_eq!(map.lookup(3).map(|f| f.name.as_str()), Some("a.cn"));
        assert_eq!(map.lookup(7).map(|f| f.name.as_str()), Some("b.cn"));
        assert_eq!(map.get(b).line_col(7), (2, 1));
        assert_eq!(map.get(b).slice(Span::new(4, 2)), Some("de"));
        assert!(map.lookup(100).is_none());
    }
}
