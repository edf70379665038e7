//! The parser collaborator contract.

use crate::node::SpanNode;

/// A full-document structure parser.
///
/// [`SourceStructure`](crate::structure::SourceStructure) owns one value of
/// this trait and calls it whenever an edit cannot be reconciled by position
/// arithmetic. Implementations parse the complete document text and build a
/// fresh tree, typically through [`TreeBuilder`](crate::builder::TreeBuilder);
/// incrementality lives entirely on the host side.
///
/// The returned root should span the whole document in characters. On error
/// the host keeps serving the previous tree and marks the structure stale, so
/// a parser may fail freely on syntactically broken intermediate states.
///
/// `parse` takes `&mut self` so implementations can keep reusable state such
/// as compiled patterns or an external parser instance.
pub trait StructureParser {
    /// Error type produced when the document cannot be parsed.
    type Error;

    /// Parse `text` and return the root of a fresh node tree.
    fn parse(&mut self, text: &str) -> Result<SpanNode, Self::Error>;
}
