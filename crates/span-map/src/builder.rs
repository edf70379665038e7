//! Batch construction of node trees.
//!
//! Parsers produce absolute spans; the tree stores relative offsets. The
//! [`TreeBuilder`] bridges the two: callers open and close nodes in document
//! order with absolute character spans, and the builder validates nesting and
//! ordering while converting every offset to parent-relative form.

use std::fmt;

use crate::kind::NodeKind;
use crate::node::SpanNode;
use crate::tree::NodeTree;

/// Errors reported while assembling a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A child span was empty.
    EmptySpan {
        /// Span start offset.
        start: usize,
        /// Span end offset.
        end: usize,
    },
    /// A child span reached outside the enclosing open node.
    OutsideParent {
        /// Child span start.
        start: usize,
        /// Child span end.
        end: usize,
        /// Enclosing node start.
        parent_start: usize,
        /// Enclosing node end.
        parent_end: usize,
    },
    /// A child span started before the previous sibling ended.
    Unordered {
        /// Offending child start.
        start: usize,
        /// End of the previous sibling at the same level.
        previous_end: usize,
    },
    /// `close` was called with no open child node.
    UnbalancedClose,
    /// `finish` was called while child nodes were still open.
    UnclosedNodes {
        /// Number of nodes still open.
        open: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptySpan { start, end } => {
                write!(f, "child span [{start}, {end}) is empty")
            }
            BuildError::OutsideParent {
                start,
                end,
                parent_start,
                parent_end,
            } => write!(
                f,
                "child span [{start}, {end}) extends outside its parent [{parent_start}, {parent_end})"
            ),
            BuildError::Unordered {
                start,
                previous_end,
            } => write!(
                f,
                "child starting at {start} overlaps the previous sibling ending at {previous_end}"
            ),
            BuildError::UnbalancedClose => write!(f, "close called with no open node"),
            BuildError::UnclosedNodes { open } => {
                write!(f, "finish called with {open} node(s) still open")
            }
        }
    }
}

impl std::error::Error for BuildError {}

#[derive(Debug)]
struct PendingNode {
    kind: NodeKind,
    start: usize,
    end: usize,
    tree: NodeTree,
}

/// Incrementally assembles a node tree from absolute spans.
///
/// Nodes must be produced in document order, children nested inside their
/// parents via matched [`open`](TreeBuilder::open)/[`close`](TreeBuilder::close)
/// calls. Gaps between siblings are allowed; overlaps are not.
///
/// # Example
///
/// ```
/// use span_map::{NodeKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, 40);
/// builder.open(NodeKind::TypeDefinition, 0, 30)?;
/// builder.leaf(NodeKind::Method, 4, 20)?;
/// builder.close()?;
/// builder.leaf(NodeKind::Comment, 32, 40)?;
///
/// let root = builder.finish()?;
/// assert_eq!(root.size(), 40);
/// assert_eq!(root.children().len(), 2);
/// # Ok::<(), span_map::BuildError>(())
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    root: PendingNode,
    stack: Vec<PendingNode>,
}

impl TreeBuilder {
    /// Start a tree whose root covers `[0, document_len)`.
    ///
    /// A zero-length document yields a zero-size, childless root.
    pub fn new(root_kind: NodeKind, document_len: usize) -> Self {
        Self {
            root: PendingNode {
                kind: root_kind,
                start: 0,
                end: document_len,
                tree: NodeTree::new(),
            },
            stack: Vec::new(),
        }
    }

    fn parent(&self) -> &PendingNode {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Open a node spanning `[start, end)` inside the current open node.
    pub fn open(&mut self, kind: NodeKind, start: usize, end: usize) -> Result<(), BuildError> {
        if end <= start {
            return Err(BuildError::EmptySpan { start, end });
        }
        let parent = self.parent();
        if start < parent.start || end > parent.end {
            return Err(BuildError::OutsideParent {
                start,
                end,
                parent_start: parent.start,
                parent_end: parent.end,
            });
        }
        let previous_end = parent.start + parent.tree.extent();
        if start < previous_end {
            return Err(BuildError::Unordered {
                start,
                previous_end,
            });
        }
        self.stack.push(PendingNode {
            kind,
            start,
            end,
            tree: NodeTree::new(),
        });
        Ok(())
    }

    /// Close the most recently opened node and attach it to its parent.
    pub fn close(&mut self) -> Result<(), BuildError> {
        let done = self.stack.pop().ok_or(BuildError::UnbalancedClose)?;
        let node = SpanNode::with_children(done.kind, done.end - done.start, done.tree);
        let parent = self.stack.last_mut().unwrap_or(&mut self.root);
        parent.tree.insert_child(done.start - parent.start, node);
        Ok(())
    }

    /// Add a childless node spanning `[start, end)`.
    pub fn leaf(&mut self, kind: NodeKind, start: usize, end: usize) -> Result<(), BuildError> {
        self.open(kind, start, end)?;
        self.close()
    }

    /// Finish the build and return the root node.
    pub fn finish(self) -> Result<SpanNode, BuildError> {
        if !self.stack.is_empty() {
            return Err(BuildError::UnclosedNodes {
                open: self.stack.len(),
            });
        }
        Ok(SpanNode::with_children(
            self.root.kind,
            self.root.end,
            self.root.tree,
        ))
    }
}
