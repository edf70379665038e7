//! Ordered child collections and position queries.
//!
//! Each parent node owns one [`NodeTree`]: an ordered set of
//! (relative-offset, child) entries. Offsets are relative to the parent's own
//! start, so shifting a whole subtree never rewrites bookkeeping in sibling
//! subtrees. Queries take the parent's absolute `base` offset and return
//! absolute [`NodeSpan`] pairs computed on the fly.

use crate::node::{NodeSpan, SpanNode};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChildEntry {
    /// Offset relative to the parent node's start.
    offset: usize,
    node: SpanNode,
}

/// The ordered child collection of one parent node.
///
/// Children are kept sorted by offset and non-overlapping; contiguous
/// coverage is not required (gaps represent unparsed regions such as the
/// whitespace between members). Lookup is a binary search over the sorted
/// entries: O(log n) per level, which is plenty for the typical branching
/// factors of source structure (tens of members, not millions).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeTree {
    children: Vec<ChildEntry>,
}

/// How a removal span relates to one level of children.
pub(crate) enum RemovalAction<'a> {
    /// The span fell wholly inside one child; the child was shrunk and later
    /// siblings shifted. The caller recurses into the returned child.
    Forward {
        /// Absolute start offset of the child after the shift.
        child_base: usize,
        /// The shrunk child.
        child: &'a mut SpanNode,
    },
    /// Covered children (possibly none, for a pure-gap removal) were detached
    /// and later siblings shifted; no recursion is needed.
    Patched,
    /// The span partially overlaps a child boundary; size bookkeeping alone
    /// cannot resolve it.
    Ambiguous,
}

impl NodeTree {
    /// Create an empty child collection.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// Number of immediate children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Relative end offset of the last child (0 when empty).
    ///
    /// The structural invariant requires `extent() <= parent.size()`.
    pub fn extent(&self) -> usize {
        self.children
            .last()
            .map_or(0, |c| c.offset + c.node.size())
    }

    /// Returns `true` if children are strictly ordered and non-overlapping.
    pub fn is_ordered(&self) -> bool {
        self.children
            .windows(2)
            .all(|w| w[0].offset + w[0].node.size() <= w[1].offset)
    }

    /// Index of the child whose span contains `offset`, if any.
    fn index_of(&self, offset: usize, base: usize) -> Option<usize> {
        let rel = offset.checked_sub(base)?;
        let idx = self.children.partition_point(|c| c.offset <= rel);
        if idx == 0 {
            return None;
        }
        let entry = &self.children[idx - 1];
        (rel < entry.offset + entry.node.size()).then_some(idx - 1)
    }

    /// Find the child whose absolute span contains `offset`.
    ///
    /// Spans are start-inclusive and end-exclusive: an offset equal to a
    /// child's start belongs to that child, an offset equal to its end does
    /// not. Returns `None` when `offset` falls in a gap or past all children.
    pub fn find_node(&self, offset: usize, base: usize) -> Option<NodeSpan<'_>> {
        let index = self.index_of(offset, base)?;
        let entry = &self.children[index];
        Some(NodeSpan::new(&entry.node, base + entry.offset))
    }

    /// Find the child containing `offset`, or the nearest child ending at or
    /// before it.
    ///
    /// Used when searching backward from a removal span.
    pub fn find_node_at_or_before(&self, offset: usize, base: usize) -> Option<NodeSpan<'_>> {
        let rel = offset.checked_sub(base)?;
        let idx = self.children.partition_point(|c| c.offset <= rel);
        if idx == 0 {
            return None;
        }
        let entry = &self.children[idx - 1];
        Some(NodeSpan::new(&entry.node, base + entry.offset))
    }

    /// Find the child containing `offset`, or the first child starting at or
    /// after it.
    ///
    /// Forward-scanning variant used for subtree iteration.
    pub fn find_node_at_or_after(&self, offset: usize, base: usize) -> Option<NodeSpan<'_>> {
        let rel = offset.saturating_sub(base);
        let idx = self.children.partition_point(|c| c.offset < rel);
        if idx > 0 {
            let entry = &self.children[idx - 1];
            if rel < entry.offset + entry.node.size() {
                return Some(NodeSpan::new(&entry.node, base + entry.offset));
            }
        }
        self.children
            .get(idx)
            .map(|e| NodeSpan::new(&e.node, base + e.offset))
    }

    /// Insert a child at the given offset relative to the parent.
    ///
    /// The entry is placed to keep children sorted by offset. The caller is
    /// responsible for not introducing overlaps; ordering violations are
    /// caught in debug builds.
    pub fn insert_child(&mut self, rel_offset: usize, node: SpanNode) {
        let pos = self
            .children
            .binary_search_by_key(&rel_offset, |c| c.offset)
            .unwrap_or_else(|pos| pos);

        self.children.insert(
            pos,
            ChildEntry {
                offset: rel_offset,
                node,
            },
        );
        debug_assert!(self.is_ordered(), "child spans must not overlap");
    }

    /// Detach and return the child at `index`.
    pub fn detach(&mut self, index: usize) -> Option<SpanNode> {
        if index >= self.children.len() {
            return None;
        }
        Some(self.children.remove(index).node)
    }

    /// Detach all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Iterate over `(relative_offset, child)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SpanNode)> + '_ {
        self.children.iter().map(|c| (c.offset, &c.node))
    }

    /// Iterate over children as absolute [`NodeSpan`]s for a parent at `base`.
    pub fn spans(&self, base: usize) -> impl Iterator<Item = NodeSpan<'_>> + '_ {
        self.children
            .iter()
            .map(move |c| NodeSpan::new(&c.node, base + c.offset))
    }

    /// Grow the child containing an insertion point and shift later siblings.
    ///
    /// Returns the child's absolute start and a mutable reference for
    /// recursion, or `None` when the insertion lands in a gap or past all
    /// children.
    pub(crate) fn grow_child_for_insertion(
        &mut self,
        offset: usize,
        base: usize,
        len: usize,
    ) -> Option<(usize, &mut SpanNode)> {
        let index = self.index_of(offset, base)?;
        for entry in &mut self.children[index + 1..] {
            entry.offset += len;
        }
        let entry = &mut self.children[index];
        entry.node.grow(len);
        Some((base + entry.offset, &mut entry.node))
    }

    /// Classify and apply a removal span `[start, start + len)` against this
    /// level of children.
    ///
    /// Children wholly before the span are untouched. A child wholly covering
    /// the span absorbs it (shrink + forward); children wholly covered by the
    /// span are detached; children past the span shift left. Any partial
    /// boundary overlap is reported as ambiguous without touching this level.
    pub(crate) fn classify_removal(
        &mut self,
        start: usize,
        base: usize,
        len: usize,
    ) -> RemovalAction<'_> {
        let end = start + len;
        let mut host: Option<usize> = None;
        let mut covered: Vec<usize> = Vec::new();

        for (idx, entry) in self.children.iter().enumerate() {
            let child_start = base + entry.offset;
            let child_end = child_start + entry.node.size();

            if child_end <= start {
                // Wholly before the removed span.
                continue;
            }
            if child_start >= end {
                // Children are ordered; nothing further can overlap.
                break;
            }
            if child_start >= start && child_end <= end {
                covered.push(idx);
            } else if child_start <= start && end <= child_end {
                host = Some(idx);
            } else {
                return RemovalAction::Ambiguous;
            }
        }

        if let Some(index) = host {
            let child_base = base + self.children[index].offset;
            debug_assert!(len <= self.children[index].node.size());
            if self.children[index].node.try_shrink(len).is_err() {
                return RemovalAction::Ambiguous;
            }
            for entry in &mut self.children[index + 1..] {
                entry.offset -= len;
            }
            let entry = &mut self.children[index];
            return RemovalAction::Forward {
                child_base,
                child: &mut entry.node,
            };
        }

        for idx in covered.into_iter().rev() {
            self.children.remove(idx);
        }

        // start >= base on every recursion level, so the subtraction is safe.
        let rel_end = end - base;
        for entry in &mut self.children {
            if entry.offset >= rel_end {
                entry.offset -= len;
            }
        }

        RemovalAction::Patched
    }
}
