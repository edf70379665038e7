//! Edit reconciliation against an existing node tree.
//!
//! The reconciler answers one question per edit: can the tree's positions be
//! patched by size arithmetic alone, or did the edit change structure? The
//! rules are deliberately conservative. An insertion is absorbed by the child
//! whose span contains the insertion point and recursed into it; an insertion
//! into a gap between children means new structure may have appeared and is
//! reported as [`Reconciliation::ReparseNeeded`]. A removal wholly inside one
//! child shrinks that child and recurses; a removal covering children detaches
//! them; a removal cutting across a child boundary is ambiguous and again
//! reported for reparse.
//!
//! When `ReparseNeeded` is returned the tree may have been partially adjusted
//! along the descent path. Callers must rebuild it before serving further
//! position queries; [`SourceStructure`](crate::structure::SourceStructure)
//! does this automatically.

use crate::node::SpanNode;
use crate::tree::RemovalAction;

/// Outcome of reconciling one edit against the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Positions were fully repaired by size arithmetic; the tree is current.
    Patched,
    /// The edit may have changed structure; the tree must be rebuilt from the
    /// document text.
    ReparseNeeded,
}

/// Reconcile an insertion of `len` characters at absolute `offset` inside
/// `node`, whose own span starts at absolute `base`.
///
/// The caller has already grown `node` itself; this routine only repairs the
/// descendants. A node without children absorbs the growth outright, which is
/// what keeps typing inside a leaf span free of reparses.
pub fn apply_insertion(
    node: &mut SpanNode,
    base: usize,
    offset: usize,
    len: usize,
) -> Reconciliation {
    if len == 0 {
        return Reconciliation::Patched;
    }
    if node.children().is_empty() {
        return Reconciliation::Patched;
    }
    match node.children_mut().grow_child_for_insertion(offset, base, len) {
        Some((child_base, child)) => apply_insertion(child, child_base, offset, len),
        None => Reconciliation::ReparseNeeded,
    }
}

/// Reconcile a removal of `len` characters at absolute `start` inside `node`,
/// whose own span starts at absolute `base`.
///
/// The caller has already shrunk `node` itself. Children wholly covered by
/// the removed span are detached; a child wholly containing the span shrinks
/// and is recursed into; a span cutting across a child boundary yields
/// [`Reconciliation::ReparseNeeded`].
pub fn apply_removal(
    node: &mut SpanNode,
    base: usize,
    start: usize,
    len: usize,
) -> Reconciliation {
    if len == 0 {
        return Reconciliation::Patched;
    }
    if node.children().is_empty() {
        return Reconciliation::Patched;
    }
    match node.children_mut().classify_removal(start, base, len) {
        RemovalAction::Forward { child_base, child } => apply_removal(child, child_base, start, len),
        RemovalAction::Patched => Reconciliation::Patched,
        RemovalAction::Ambiguous => Reconciliation::ReparseNeeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeKind;

    /// A small compilation unit shape:
    ///
    /// ```text
    /// CompilationUnit [0, 30)
    /// ├── Comment [0, 5)
    /// └── TypeDefinition [6, 26)
    ///     ├── Field [10, 14)
    ///     └── Method [16, 24)
    /// ```
    fn sample_root() -> SpanNode {
        let mut class = SpanNode::new(NodeKind::TypeDefinition, 20);
        class
            .children_mut()
            .insert_child(4, SpanNode::new(NodeKind::Field, 4));
        class
            .children_mut()
            .insert_child(10, SpanNode::new(NodeKind::Method, 8));

        let mut root = SpanNode::new(NodeKind::CompilationUnit, 30);
        root.children_mut()
            .insert_child(0, SpanNode::new(NodeKind::Comment, 5));
        root.children_mut().insert_child(6, class);
        root
    }

    fn assert_well_formed(node: &SpanNode) {
        assert!(node.children().is_ordered());
        assert!(node.children().extent() <= node.size());
        for (_, child) in node.children().iter() {
            assert_well_formed(child);
        }
    }

    fn span_of(root: &SpanNode, offset: usize) -> (usize, usize) {
        let span = root.children().find_node(offset, 0).unwrap();
        (span.start(), span.end())
    }

    #[test]
    fn test_insertion_inside_leaf_grows_ancestor_chain() {
        let mut root = sample_root();
        root.grow(3);

        // Offset 12 is inside the Field leaf.
        let outcome = apply_insertion(&mut root, 0, 12, 3);
        assert_eq!(outcome, Reconciliation::Patched);

        assert_eq!(root.size(), 33);
        assert_eq!(span_of(&root, 12), (6, 29)); // class grew
        let class = root.children().find_node(12, 0).unwrap();
        let field = class.node().children().find_node(12, class.start()).unwrap();
        assert_eq!((field.start(), field.end()), (10, 17));
        let method = class.node().children().find_node(19, class.start()).unwrap();
        assert_eq!((method.start(), method.end()), (19, 27)); // shifted right
        assert_well_formed(&root);
    }

    #[test]
    fn test_insertion_at_child_start_belongs_to_that_child() {
        let mut root = sample_root();
        root.grow(2);

        // Offset 16 is the Method's start (start-inclusive).
        let outcome = apply_insertion(&mut root, 0, 16, 2);
        assert_eq!(outcome, Reconciliation::Patched);

        let class = root.children().find_node(16, 0).unwrap();
        let method = class.node().children().find_node(16, class.start()).unwrap();
        assert_eq!((method.start(), method.end()), (16, 26));
        assert_well_formed(&root);
    }

    #[test]
    fn test_insertion_in_gap_needs_reparse() {
        let mut root = sample_root();
        root.grow(1);

        // Offset 5 is the Comment's exclusive end: a gap before the class.
        let outcome = apply_insertion(&mut root, 0, 5, 1);
        assert_eq!(outcome, Reconciliation::ReparseNeeded);
    }

    #[test]
    fn test_insertion_past_all_children_needs_reparse() {
        let mut root = sample_root();
        root.grow(4);

        // Offset 27 is inside the root but after every child span.
        let outcome = apply_insertion(&mut root, 0, 27, 4);
        assert_eq!(outcome, Reconciliation::ReparseNeeded);
    }

    #[test]
    fn test_removal_inside_leaf_shrinks_ancestor_chain() {
        let mut root = sample_root();
        assert!(root.try_shrink(2).is_ok());

        // Remove [11, 13), wholly inside the Field leaf.
        let outcome = apply_removal(&mut root, 0, 11, 2);
        assert_eq!(outcome, Reconciliation::Patched);

        assert_eq!(root.size(), 28);
        let class = root.children().find_node(11, 0).unwrap();
        assert_eq!((class.start(), class.end()), (6, 24));
        let field = class.node().children().find_node(10, class.start()).unwrap();
        assert_eq!((field.start(), field.end()), (10, 12));
        let method = class.node().children().find_node(14, class.start()).unwrap();
        assert_eq!((method.start(), method.end()), (14, 22)); // shifted left
        assert_well_formed(&root);
    }

    #[test]
    fn test_removal_across_child_boundary_needs_reparse() {
        let mut root = sample_root();
        assert!(root.try_shrink(4).is_ok());

        // [4, 8) clips the Comment's tail and the class's head.
        let outcome = apply_removal(&mut root, 0, 4, 4);
        assert_eq!(outcome, Reconciliation::ReparseNeeded);
    }

    #[test]
    fn test_removal_covering_child_detaches_it() {
        let mut root = sample_root();
        assert!(root.try_shrink(6).is_ok());

        // [0, 6) covers the Comment and the gap after it.
        let outcome = apply_removal(&mut root, 0, 0, 6);
        assert_eq!(outcome, Reconciliation::Patched);

        assert_eq!(root.children().len(), 1);
        assert_eq!(span_of(&root, 0), (0, 20)); // class shifted to the front
        assert_well_formed(&root);
    }

    #[test]
    fn test_removal_of_exact_child_span_detaches_it() {
        let mut root = sample_root();
        assert!(root.try_shrink(20).is_ok());

        // [6, 26) is exactly the class span: covered, not ambiguous.
        let outcome = apply_removal(&mut root, 0, 6, 20);
        assert_eq!(outcome, Reconciliation::Patched);

        assert_eq!(root.size(), 10);
        assert_eq!(root.children().len(), 1);
        assert_eq!(span_of(&root, 0), (0, 5));
        assert_well_formed(&root);
    }

    #[test]
    fn test_removal_of_pure_gap_shifts_later_children() {
        let mut root = sample_root();
        assert!(root.try_shrink(1).is_ok());

        // [5, 6) is the gap between the Comment and the class.
        let outcome = apply_removal(&mut root, 0, 5, 1);
        assert_eq!(outcome, Reconciliation::Patched);

        assert_eq!(span_of(&root, 0), (0, 5));
        assert_eq!(span_of(&root, 5), (5, 25));
        assert_well_formed(&root);
    }

    #[test]
    fn test_zero_length_edits_are_noops() {
        let mut root = sample_root();
        let before = root.clone();

        assert_eq!(apply_insertion(&mut root, 0, 12, 0), Reconciliation::Patched);
        assert_eq!(apply_removal(&mut root, 0, 12, 0), Reconciliation::Patched);
        assert_eq!(root, before);
    }

    #[test]
    fn test_childless_root_absorbs_everything() {
        let mut root = SpanNode::new(NodeKind::CompilationUnit, 10);
        root.grow(5);
        assert_eq!(apply_insertion(&mut root, 0, 7, 5), Reconciliation::Patched);
        assert!(root.try_shrink(3).is_ok());
        assert_eq!(apply_removal(&mut root, 0, 2, 3), Reconciliation::Patched);
        assert_eq!(root.size(), 12);
    }
}
