//! Span nodes and the per-node size ledger.
//!
//! A node stores its kind, its current size in characters, and its children.
//! It deliberately does **not** store its own absolute offset: the offset is
//! derived by accumulating relative offsets along the path from the root, so
//! an edit near the start of a document never rewrites bookkeeping in
//! unrelated subtrees.

use crate::kind::NodeKind;
use crate::tree::NodeTree;

/// Error returned when a shrink would take a node's size below zero.
///
/// Sizes are unsigned, so the invalid state is unrepresentable; this error is
/// the signal that a caller attempted it. The edit reconciler converts it into
/// a full-reparse trigger rather than leaving an inconsistent tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeUnderflow {
    /// Node size at the time of the attempt.
    pub size: usize,
    /// Requested shrink amount.
    pub delta: usize,
}

impl std::fmt::Display for SizeUnderflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot shrink node of size {} by {} characters",
            self.size, self.delta
        )
    }
}

impl std::error::Error for SizeUnderflow {}

/// A tracked syntactic region of a source document.
///
/// The node's span is the half-open interval `[start, start + size)`, where
/// `start` is derived during traversal (see [`NodeSpan`]). Children are owned
/// exclusively by their parent; there are no back-references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanNode {
    kind: NodeKind,
    size: usize,
    children: NodeTree,
}

impl SpanNode {
    /// Create a childless node of the given kind and size.
    pub fn new(kind: NodeKind, size: usize) -> Self {
        Self {
            kind,
            size,
            children: NodeTree::new(),
        }
    }

    /// Create a node with an existing child collection.
    pub fn with_children(kind: NodeKind, size: usize, children: NodeTree) -> Self {
        Self {
            kind,
            size,
            children,
        }
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Current size in characters.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Replace the stored size.
    ///
    /// No side effects beyond the stored value; the caller is responsible for
    /// keeping parent sizes consistent.
    pub fn set_size(&mut self, new_size: usize) {
        self.size = new_size;
    }

    /// Increase the size by `delta` characters.
    pub fn grow(&mut self, delta: usize) {
        self.size = self.size.saturating_add(delta);
    }

    /// Decrease the size by `delta` characters.
    ///
    /// Fails with [`SizeUnderflow`] if `delta` exceeds the current size. The
    /// stored size is left untouched on failure.
    pub fn try_shrink(&mut self, delta: usize) -> Result<(), SizeUnderflow> {
        if delta > self.size {
            return Err(SizeUnderflow {
                size: self.size,
                delta,
            });
        }
        self.size -= delta;
        Ok(())
    }

    /// The node's ordered child collection.
    pub fn children(&self) -> &NodeTree {
        &self.children
    }

    /// Mutable access to the child collection.
    pub fn children_mut(&mut self) -> &mut NodeTree {
        &mut self.children
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node reference paired with its absolute position at query time.
///
/// This pairing is transient: it is computed on the fly while descending the
/// tree and never stored, so it cannot go stale inside the structure itself.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpan<'a> {
    node: &'a SpanNode,
    start: usize,
}

impl<'a> NodeSpan<'a> {
    /// Pair a node with its absolute start offset.
    pub fn new(node: &'a SpanNode, start: usize) -> Self {
        Self { node, start }
    }

    /// The referenced node.
    pub fn node(&self) -> &'a SpanNode {
        self.node
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Absolute start offset (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Size in characters.
    pub fn size(&self) -> usize {
        self.node.size()
    }

    /// Absolute end offset (exclusive).
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.node.size())
    }

    /// Whether the half-open span `[start, end)` contains `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_and_shrink() {
        let mut node = SpanNode::new(NodeKind::Method, 10);
        node.grow(5);
        assert_eq!(node.size(), 15);

        node.try_shrink(3).unwrap();
        assert_eq!(node.size(), 12);
    }

    #[test]
    fn test_shrink_underflow_is_rejected() {
        let mut node = SpanNode::new(NodeKind::Statement, 4);
        let err = node.try_shrink(5).unwrap_err();
        assert_eq!(err, SizeUnderflow { size: 4, delta: 5 });
        // The stored size is untouched after a rejected shrink.
        assert_eq!(node.size(), 4);

        assert!(node.try_shrink(4).is_ok());
        assert_eq!(node.size(), 0);
    }

    #[test]
    fn test_set_size() {
        let mut node = SpanNode::new(NodeKind::Block, 1);
        node.set_size(99);
        assert_eq!(node.size(), 99);
    }

    #[test]
    fn test_node_span_boundaries() {
        let node = SpanNode::new(NodeKind::Statement, 6);
        let span = NodeSpan::new(&node, 4);

        assert_eq!(span.start(), 4);
        assert_eq!(span.end(), 10);
        assert!(span.contains(4));
        assert!(span.contains(9));
        assert!(!span.contains(10));
        assert!(!span.contains(3));
    }

    #[test]
    fn test_zero_size_span_contains_nothing() {
        let node = SpanNode::new(NodeKind::Expression, 0);
        let span = NodeSpan::new(&node, 7);
        assert!(!span.contains(7));
        assert_eq!(span.start(), span.end());
    }

    #[test]
    fn test_underflow_display() {
        let err = SizeUnderflow { size: 2, delta: 9 };
        assert_eq!(
            err.to_string(),
            "cannot shrink node of size 2 by 9 characters"
        );
    }
}
