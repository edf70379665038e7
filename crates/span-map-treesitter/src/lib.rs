#![warn(missing_docs)]
//! `span-map-treesitter` - Tree-sitter integration for `span-map`.
//!
//! This crate implements `span_map::StructureParser` on top of a Tree-sitter
//! grammar and a structure query (`.scm`). Each query capture name is mapped
//! to a `span_map::NodeKind`; the captured ranges are nested by containment
//! and assembled into the span tree that `span_map::SourceStructure` keeps in
//! sync across edits.
//!
//! Tree-sitter reports byte ranges; this crate converts them to the character
//! offsets the span tree is addressed in.

mod parser;

pub use parser::{TreeSitterStructureConfig, TreeSitterStructureError, TreeSitterStructureParser};
