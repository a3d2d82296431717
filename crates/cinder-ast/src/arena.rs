// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pooled AST storage.
//!
//! Nodes live in one growable slot vector addressed by [`NodeId`]; freed
//! slots are threaded onto a free list and reused before the vector grows.
//! Child sequences are collected in [`SequenceBuffer`]s drawn from
//! size-classed pools, so the parser can build and discard lists without
//! allocating per element.

use tracing::trace;

use crate::intern::Key;
use crate::node::{Node, NodeId, NodeKind, Payload};
use crate::Span;

/// Capacities of the pooled sequence buffers. Each class is four times the
/// previous one; buffers outgrowing the last class are not pooled.
pub const SIZE_CLASSES: [usize; 5] = [64, 256, 1024, 4096, 16384];

static MARKERS: [Node; NodeId::MARKER_COUNT as usize] = [
    Node { kind: NodeKind::None, span: Span::new(0, 0), payload: Payload::Empty },
    Node { kind: NodeKind::Invalid, span: Span::new(0, 0), payload: Payload::Empty },
    Node { kind: NodeKind::Inferred, span: Span::new(0, 0), payload: Payload::Empty },
];

#[derive(Debug)]
enum Slot {
    Live(Node),
    Free { next: Option<u32> },
}

/// Arena owning every node of one compilation unit.
#[derive(Debug)]
pub struct Ast {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    live: usize,
    pools: [Vec<Vec<NodeId>>; SIZE_CLASSES.len()],
}

/// Children collected for a node that is still being parsed.
///
/// Obtain one with [`Ast::sequence`] and hand it back with either
/// [`Ast::finish`] or [`Ast::abandon`].
#[derive(Debug)]
#[must_use = "a sequence must be finished or abandoned"]
pub struct SequenceBuffer {
    class: usize,
    items: Vec<NodeId>,
}

impl SequenceBuffer {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.items
    }

    /// Current size class index; `SIZE_CLASSES.len()` once past the last.
    pub fn size_class(&self) -> usize {
        self.class
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Arena with room for `nodes` live nodes before the slot vector grows.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            slots: Vec::with_capacity(nodes),
            free_head: None,
            live: 0,
            pools: Default::default(),
        }
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    pub fn alloc(&mut self, kind: NodeKind, span: Span, payload: Payload) -> NodeId {
        debug_assert!(
            !matches!(kind, NodeKind::None | NodeKind::Inferred),
            "{:?} is a marker and is never allocated",
            kind
        );
        let node = Node { kind, span, payload };
        self.live += 1;

        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            match *slot {
                Slot::Free { next } => self.free_head = next,
                Slot::Live(_) => unreachable!("free list points at a live slot"),
            }
            *slot = Slot::Live(node);
            return NodeId(index + NodeId::MARKER_COUNT);
        }

        let index = match u32::try_from(self.slots.len())
            .ok()
            .filter(|i| i.checked_add(NodeId::MARKER_COUNT).is_some())
        {
            Some(index) => index,
            None => panic!("AST arena exhausted after {} nodes", self.slots.len()),
        };
        self.slots.push(Slot::Live(node));
        NodeId(index + NodeId::MARKER_COUNT)
    }

    pub fn leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.alloc(kind, span, Payload::Empty)
    }

    pub fn scalar(&mut self, kind: NodeKind, span: Span, value: u64) -> NodeId {
        self.alloc(kind, span, Payload::Scalar(value))
    }

    pub fn named(&mut self, kind: NodeKind, span: Span, key: Key) -> NodeId {
        debug_assert!(kind.carries_key());
        self.alloc(kind, span, Payload::Scalar(key.to_raw()))
    }

    pub fn unary(&mut self, kind: NodeKind, span: Span, child: NodeId) -> NodeId {
        self.alloc(kind, span, Payload::Single(child))
    }

    pub fn binary(&mut self, kind: NodeKind, span: Span, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(kind, span, Payload::Pair([left, right]))
    }

    /// Node with a fixed, already known child list.
    pub fn many(&mut self, kind: NodeKind, span: Span, children: &[NodeId]) -> NodeId {
        self.alloc(kind, span, Payload::Many(children.into()))
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, id: NodeId) -> &Node {
        if id.is_marker() {
            return &MARKERS[id.0 as usize];
        }
        match &self.slots[(id.0 - NodeId::MARKER_COUNT) as usize] {
            Slot::Live(node) => node,
            Slot::Free { .. } => panic!("use of freed node {:?}", id),
        }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).children()
    }

    /// Interned key of a name, identifier or string node.
    pub fn key(&self, id: NodeId) -> Option<Key> {
        let node = self.get(id);
        if node.kind.carries_key() {
            node.scalar().map(Key::from_raw)
        } else {
            None
        }
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        id.is_marker()
            || matches!(
                self.slots.get((id.0 - NodeId::MARKER_COUNT) as usize),
                Some(Slot::Live(_))
            )
    }

    /// Merge `base` with the spans of every non-marker node in `ids`.
    pub fn cover(&self, base: Span, ids: &[NodeId]) -> Span {
        ids.iter()
            .filter(|id| !id.is_marker())
            .fold(base, |span, &id| span.merge(self.span(id)))
    }

    /// True if `id` or any descendant has kind `Invalid`.
    pub fn contains_invalid(&self, id: NodeId) -> bool {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.kind == NodeKind::Invalid {
                return true;
            }
            stack.extend_from_slice(node.children());
        }
        false
    }

    /// Number of allocated, not yet freed nodes.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of idle buffers waiting in the pool of `class`.
    pub fn pooled_buffers(&self, class: usize) -> usize {
        self.pools.get(class).map_or(0, Vec::len)
    }

    // =========================================================================
    // Release
    // =========================================================================

    /// Free `root` and every non-marker node below it.
    pub fn free(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if id.is_marker() {
                continue;
            }
            let index = id.0 - NodeId::MARKER_COUNT;
            let slot = &mut self.slots[index as usize];
            if let Slot::Free { .. } = slot {
                panic!("double free of node {:?}", id);
            }
            let freed = std::mem::replace(slot, Slot::Free { next: self.free_head });
            if let Slot::Live(node) = freed {
                stack.extend_from_slice(node.children());
            }
            self.free_head = Some(index);
            self.live -= 1;
        }
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    /// Start collecting children in the smallest size class.
    pub fn sequence(&mut self) -> SequenceBuffer {
        SequenceBuffer { class: 0, items: self.take_buffer(0) }
    }

    pub fn push(&mut self, seq: &mut SequenceBuffer, id: NodeId) {
        if seq.class < SIZE_CLASSES.len() && seq.items.len() == SIZE_CLASSES[seq.class] {
            self.upgrade(seq);
        }
        seq.items.push(id);
    }

    /// Freeze the collected children into a new node.
    pub fn finish(&mut self, seq: SequenceBuffer, kind: NodeKind, span: Span) -> NodeId {
        let children: Box<[NodeId]> = seq.items.as_slice().into();
        self.release_buffer(seq.class, seq.items);
        self.alloc(kind, span, Payload::Many(children))
    }

    /// Release a one-element buffer, handing its element back unfreed.
    pub fn unwrap_single(&mut self, seq: SequenceBuffer) -> NodeId {
        assert_eq!(seq.items.len(), 1, "unwrap_single on a sequence of {}", seq.items.len());
        let only = seq.items[0];
        self.release_buffer(seq.class, seq.items);
        only
    }

    /// Free every collected child and release the buffer.
    pub fn abandon(&mut self, seq: SequenceBuffer) {
        for &id in seq.items.iter() {
            self.free(id);
        }
        self.release_buffer(seq.class, seq.items);
    }

    fn take_buffer(&mut self, class: usize) -> Vec<NodeId> {
        self.pools[class]
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(SIZE_CLASSES[class]))
    }

    fn release_buffer(&mut self, class: usize, mut items: Vec<NodeId>) {
        if class < SIZE_CLASSES.len() {
            items.clear();
            self.pools[class].push(items);
        }
    }

    fn upgrade(&mut self, seq: &mut SequenceBuffer) {
        let next = seq.class + 1;
        let mut grown = if next < SIZE_CLASSES.len() {
            self.take_buffer(next)
        } else {
            // Past the last class the buffer grows like a plain Vec
            Vec::with_capacity(seq.items.len() * 4)
        };
        grown.extend_from_slice(&seq.items);
        let old = std::mem::replace(&mut seq.items, grown);
        self.release_buffer(seq.class, old);
        trace!(from = SIZE_CLASSES[seq.class], len = seq.items.len(), "sequence buffer upgraded");
        seq.class = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(ast: &mut Ast, start: u32, value: u64) -> NodeId {
        ast.scalar(NodeKind::Integer, Span::new(start, 1), value)
    }

    #[test]
    fn markers_are_shared_constants() {
        let ast = Ast::new();
        assert_eq!(ast.kind(NodeId::NONE), NodeKind::None);
        assert_eq!(ast.kind(NodeId::INVALID), NodeKind::Invalid);
        assert_eq!(ast.kind(NodeId::INFERRED), NodeKind::Inferred);
        assert_eq!(ast.live_count(), 0);
    }

    #[test]
    fn free_releases_descendants_and_skips_markers() {
        let mut ast = Ast::new();
        let one = int(&mut ast, 0, 1);
        let two = int(&mut ast, 4, 2);
        let add = ast.binary(NodeKind::Add, Span::new(0, 5), one, two);
        let bad = ast.many(
            NodeKind::Invalid,
            Span::new(0, 9),
            &[add, NodeId::INVALID, NodeId::NONE],
        );
        assert_eq!(ast.live_count(), 4);

        ast.free(bad);
        assert_eq!(ast.live_count(), 0);
        assert!(!ast.is_live(one));
        assert!(ast.is_live(NodeId::INVALID));
        assert_eq!(ast.kind(NodeId::INVALID), NodeKind::Invalid);

        // Markers may be "freed" any number of times
        ast.free(NodeId::INVALID);
        ast.free(NodeId::NONE);
        assert_eq!(ast.live_count(), 0);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut ast = Ast::new();
        let a = int(&mut ast, 0, 1);
        let b = int(&mut ast, 1, 2);
        ast.free(a);
        let c = int(&mut ast, 2, 3);
        assert_eq!(c, a);
        assert_ne!(c, b);
        assert_eq!(ast.get(c).scalar(), Some(3));
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn double_free_panics() {
        let mut ast = Ast::new();
        let a = int(&mut ast, 0, 1);
        ast.free(a);
        ast.free(a);
    }

    #[test]
    fn sequence_upgrades_through_size_classes() {
        let mut ast = Ast::new();
        let mut seq = ast.sequence();
        for i in 0..64 {
            let n = int(&mut ast, i, i as u64);
            ast.push(&mut seq, n);
        }
        assert_eq!(seq.size_class(), 0);
        assert_eq!(ast.pooled_buffers(0), 0);

        let n = int(&mut ast, 64, 64);
        ast.push(&mut seq, n);
        assert_eq!(seq.size_class(), 1);
        // The outgrown buffer went back to its pool
        assert_eq!(ast.pooled_buffers(0), 1);
        assert_eq!(seq.len(), 65);
        assert_eq!(seq.as_slice()[64], n);

        let list = ast.finish(seq, NodeKind::List, Span::new(0, 65));
        assert_eq!(ast.children(list).len(), 65);
        assert_eq!(ast.pooled_buffers(1), 1);
    }

    #[test]
    fn sequence_grows_past_last_class() {
        let mut ast = Ast::new();
        let mut seq = ast.sequence();
        let last = SIZE_CLASSES[SIZE_CLASSES.len() - 1];
        for _ in 0..=last {
            ast.push(&mut seq, NodeId::NONE);
        }
        assert_eq!(seq.size_class(), SIZE_CLASSES.len());
        assert_eq!(seq.len(), last + 1);
        ast.abandon(seq);
        // Every pooled class got its outgrown buffer back
        for class in 0..SIZE_CLASSES.len() {
            assert_eq!(ast.pooled_buffers(class), 1, "class {}", class);
        }
    }

    #[test]
    fn abandon_frees_buffered_nodes() {
        let mut ast = Ast::new();
        let mut seq = ast.sequence();
        for i in 0..3 {
            let n = int(&mut ast, i, 0);
            ast.push(&mut seq, n);
        }
        ast.push(&mut seq, NodeId::INVALID);
        assert_eq!(ast.live_count(), 3);
        ast.abandon(seq);
        assert_eq!(ast.live_count(), 0);
        assert_eq!(ast.pooled_buffers(0), 1);
    }

    #[test]
    fn unwrap_single_keeps_the_node() {
        let mut ast = Ast::new();
        let mut seq = ast.sequence();
        let n = int(&mut ast, 7, 0);
        ast.push(&mut seq, n);
        assert_eq!(ast.unwrap_single(seq), n);
        assert!(ast.is_live(n));
        assert_eq!(ast.pooled_buffers(0), 1);
    }

    #[test]
    fn cover_ignores_markers() {
        let mut ast = Ast::new();
        let a = int(&mut ast, 10, 1);
        let span = ast.cover(Span::new(8, 1), &[a, NodeId::NONE, NodeId::INFERRED]);
        assert_eq!(span, Span::new(8, 3));
    }

    #[test]
    fn invalid_detection_looks_through_children() {
        let mut ast = Ast::new();
        let a = int(&mut ast, 0, 1);
        let ok = ast.unary(NodeKind::Negate, Span::new(0, 2), a);
        assert!(!ast.contains_invalid(ok));
        let bad = ast.binary(NodeKind::Add, Span::new(0, 4), ok, NodeId::INVALID);
        assert!(ast.contains_invalid(bad));
    }
}
