//! An incremental source-position node tree for editor backends.
//!
//! `span-map` keeps a tree of typed source spans (types, methods, fields,
//! statements, comments) registered with character positions in a live
//! document. Edits arrive as insertions and removals; the library patches
//! node positions arithmetically whenever the edit provably left structure
//! intact, and asks a pluggable [`StructureParser`] for a full reparse
//! whenever it did not. The tree answers position queries the whole time,
//! even while stale after a failed parse.
//!
//! # Architecture
//!
//! ```text
//!                      text edits
//!                          │
//!                          ▼
//!                ┌───────────────────┐
//!                │  SourceStructure  │  versions, staleness, tickets
//!                └─────────┬─────────┘
//!                          │
//!              ┌───────────┴───────────┐
//!              │ patched               │ reparse needed
//!              ▼                       ▼
//!      ┌──────────────┐      ┌─────────────────┐
//!      │  reconcile   │      │ StructureParser │
//!      │ (arithmetic) │      │  (full parse)   │
//!      └──────┬───────┘      └────────┬────────┘
//!             │                       │ TreeBuilder
//!             ▼                       ▼
//!          ┌─────────────────────────────┐
//!          │   SpanNode / NodeTree       │
//!          │   relative-offset spans     │
//!          └─────────────────────────────┘
//! ```
//!
//! Children store offsets relative to their parent, so patching an edit costs
//! one walk down the containing path instead of a whole-tree renumbering.
//! Whenever an edit is ambiguous (it crosses a node boundary or lands in the
//! unparsed gap between siblings) the reconciler refuses to guess and reports
//! [`Reconciliation::ReparseNeeded`]; correctness always wins over cleverness.
//!
//! # Quick Start
//!
//! ```
//! use span_map::{NodeKind, SourceStructure, StructureParser, TreeBuilder, UpdateMode};
//!
//! /// Treats every non-empty line as one statement.
//! struct LineParser;
//!
//! impl StructureParser for LineParser {
//!     type Error = span_map::BuildError;
//!
//!     fn parse(&mut self, text: &str) -> Result<span_map::SpanNode, Self::Error> {
//!         let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, text.chars().count());
//!         let mut offset = 0;
//!         for line in text.split_inclusive('\n') {
//!             let body = line.trim_end_matches('\n').chars().count();
//!             if body > 0 {
//!                 builder.leaf(NodeKind::Statement, offset, offset + body)?;
//!             }
//!             offset += line.chars().count();
//!         }
//!         builder.finish()
//!     }
//! }
//!
//! let mut structure = SourceStructure::new(LineParser);
//! structure.reparse("let a = 1;\nlet b = 2;\n");
//!
//! // Typing inside a statement is patched without reparsing.
//! let mode = structure.text_inserted(4, "bc", "let abc = 1;\nlet b = 2;\n");
//! assert_eq!(mode, UpdateMode::Incremental);
//! assert_eq!(structure.node_at(0).map(|span| span.end()), Some(12));
//!
//! // Inserting into the gap between statements forces a reparse.
//! let mode = structure.text_inserted(12, "x();\n", "let abc = 1;\nx();\nlet b = 2;\n");
//! assert_eq!(mode, UpdateMode::FullReparse);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod edit;
pub mod kind;
pub mod node;
pub mod offsets;
pub mod outline;
pub mod parse;
pub mod reconcile;
pub mod structure;
pub mod tree;

pub use builder::{BuildError, TreeBuilder};
pub use edit::TextEdit;
pub use kind::NodeKind;
pub use node::{NodeSpan, SizeUnderflow, SpanNode};
pub use offsets::OffsetIndex;
pub use outline::{Outline, OutlineEntry};
pub use parse::StructureParser;
pub use reconcile::{Reconciliation, apply_insertion, apply_removal};
pub use structure::{ReparsePolicy, ReparseTicket, SourceStructure, StructureConfig, UpdateMode};
