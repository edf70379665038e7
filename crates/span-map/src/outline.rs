//! Flattened structure outlines.
//!
//! An [`Outline`] is a preorder snapshot of the tree as absolute spans,
//! the shape consumed by sidebars, breadcrumbs and symbol pickers. It copies
//! kinds and offsets only, so it stays valid after the tree it came from is
//! patched or rebuilt.

use crate::kind::NodeKind;
use crate::node::SpanNode;

/// One node of the tree, flattened to absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Classification of the node.
    pub kind: NodeKind,
    /// Absolute start offset in characters.
    pub start: usize,
    /// Absolute end offset in characters (exclusive).
    pub end: usize,
    /// Nesting depth; immediate children of the root are at depth 0.
    pub depth: usize,
}

/// A preorder listing of every node below the root.
///
/// The root itself is omitted: it always spans the whole document and adds
/// nothing to a structural overview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Flatten the tree under `root` into document order.
    pub fn from_root(root: &SpanNode) -> Self {
        let mut entries = Vec::new();
        collect(root, 0, 0, &mut entries);
        Self { entries }
    }

    /// All entries in document (preorder) order.
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree had no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind, in document order.
    pub fn find_by_kind(&self, kind: NodeKind) -> impl Iterator<Item = &OutlineEntry> + '_ {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

fn collect(node: &SpanNode, base: usize, depth: usize, entries: &mut Vec<OutlineEntry>) {
    for span in node.children().spans(base) {
        entries.push(OutlineEntry {
            kind: span.kind(),
            start: span.start(),
            end: span.end(),
            depth,
        });
        collect(span.node(), span.start(), depth + 1, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;

    #[test]
    fn test_outline_is_preorder_with_depths() {
        let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, 50);
        builder.leaf(NodeKind::Comment, 0, 5).unwrap();
        builder.open(NodeKind::TypeDefinition, 6, 46).unwrap();
        builder.leaf(NodeKind::Field, 10, 14).unwrap();
        builder.open(NodeKind::Method, 16, 44).unwrap();
        builder.leaf(NodeKind::Statement, 20, 30).unwrap();
        builder.close().unwrap();
        builder.close().unwrap();
        let root = builder.finish().unwrap();

        let outline = Outline::from_root(&root);
        let shape: Vec<(NodeKind, usize, usize, usize)> = outline
            .entries()
            .iter()
            .map(|e| (e.kind, e.start, e.end, e.depth))
            .collect();

        assert_eq!(
            shape,
            vec![
                (NodeKind::Comment, 0, 5, 0),
                (NodeKind::TypeDefinition, 6, 46, 0),
                (NodeKind::Field, 10, 14, 1),
                (NodeKind::Method, 16, 44, 1),
                (NodeKind::Statement, 20, 30, 2),
            ]
        );
    }

    #[test]
    fn test_find_by_kind() {
        let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, 30);
        builder.leaf(NodeKind::Method, 0, 10).unwrap();
        builder.leaf(NodeKind::Field, 12, 16).unwrap();
        builder.leaf(NodeKind::Method, 18, 28).unwrap();
        let root = builder.finish().unwrap();

        let outline = Outline::from_root(&root);
        let starts: Vec<usize> = outline
            .find_by_kind(NodeKind::Method)
            .map(|e| e.start)
            .collect();
        assert_eq!(starts, vec![0, 18]);
    }

    #[test]
    fn test_childless_root_yields_empty_outline() {
        let root = SpanNode::new(NodeKind::CompilationUnit, 100);
        let outline = Outline::from_root(&root);
        assert!(outline.is_empty());
        assert_eq!(outline.len(), 0);
    }
}
