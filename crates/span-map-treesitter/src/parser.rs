use span_map::{BuildError, NodeKind, OffsetIndex, SpanNode, StructureParser, TreeBuilder};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tree_sitter::{Parser, Query, QueryCursor, Tree};

#[derive(Debug, Error)]
/// Errors produced by [`TreeSitterStructureParser`].
pub enum TreeSitterStructureError {
    #[error("tree-sitter language error: {0}")]
    /// Setting the Tree-sitter language failed.
    Language(String),

    #[error("tree-sitter query error: {0}")]
    /// Compiling the structure query failed.
    Query(String),

    #[error("tree-sitter produced no parse tree")]
    /// The parser returned nothing (cancellation or timeout).
    ParseFailed,

    #[error(transparent)]
    /// The captured ranges could not be assembled into a span tree.
    Build(#[from] BuildError),
}

/// Configuration for [`TreeSitterStructureParser`].
#[derive(Debug, Clone)]
pub struct TreeSitterStructureConfig {
    /// Tree-sitter language.
    pub language: tree_sitter::Language,
    /// Structure query (`.scm`). Each capture becomes a candidate tree node.
    pub structure_query: String,
    /// Mapping from capture name (e.g. `"method"`) to a [`NodeKind`].
    ///
    /// Captures with no mapping are ignored, so one query can serve several
    /// configurations.
    pub capture_kinds: BTreeMap<String, NodeKind>,
}

impl TreeSitterStructureConfig {
    /// Create a config from a language and a structure query.
    pub fn new(language: tree_sitter::Language, structure_query: impl Into<String>) -> Self {
        Self {
            language,
            structure_query: structure_query.into(),
            capture_kinds: BTreeMap::new(),
        }
    }

    /// A ready-made query and capture mapping for Rust-like item structure.
    ///
    /// Tracks type definitions, functions, fields, `let` statements, blocks
    /// and comments.
    pub fn rust_items(language: tree_sitter::Language) -> Self {
        Self::new(
            language,
            r#"
            (struct_item) @type
            (enum_item) @type
            (union_item) @type
            (trait_item) @type
            (impl_item) @type
            (mod_item) @type
            (function_item) @method
            (field_declaration) @field
            (const_item) @field
            (static_item) @field
            (let_declaration) @statement
            (block) @block
            (line_comment) @comment
            (block_comment) @comment
            "#,
        )
        .with_kinds([
            ("type", NodeKind::TypeDefinition),
            ("method", NodeKind::Method),
            ("field", NodeKind::Field),
            ("statement", NodeKind::Statement),
            ("block", NodeKind::Block),
            ("comment", NodeKind::Comment),
        ])
    }

    /// Map one capture name to a node kind.
    pub fn with_kind(mut self, name: impl Into<String>, kind: NodeKind) -> Self {
        self.capture_kinds.insert(name.into(), kind);
        self
    }

    /// Add a set of capture name → node kind mappings.
    pub fn with_kinds<const N: usize>(mut self, kinds: [(&'static str, NodeKind); N]) -> Self {
        for (name, kind) in kinds {
            self.capture_kinds.insert(name.to_string(), kind);
        }
        self
    }
}

/// One captured range, in character offsets.
#[derive(Debug, Clone, Copy)]
struct CapturedSpan {
    start: usize,
    end: usize,
    kind: NodeKind,
}

/// A [`StructureParser`] that reads structure out of a Tree-sitter parse.
///
/// Every call parses the full document, runs the structure query and nests
/// the captured ranges by containment. Zero-width captures are dropped, and
/// when two captures produce the same range the one listed first in the query
/// wins.
pub struct TreeSitterStructureParser {
    config: TreeSitterStructureConfig,
    parser: Parser,
    query: Query,
    capture_kinds: Vec<Option<NodeKind>>,
}

impl TreeSitterStructureParser {
    /// Create a new parser from the given config.
    pub fn new(config: TreeSitterStructureConfig) -> Result<Self, TreeSitterStructureError> {
        let mut parser = Parser::new();
        parser
            .set_language(&config.language)
            .map_err(|e| TreeSitterStructureError::Language(e.to_string()))?;

        let query = Query::new(&config.language, &config.structure_query)
            .map_err(|e| TreeSitterStructureError::Query(e.to_string()))?;
        let capture_kinds = query
            .capture_names()
            .iter()
            .map(|name| config.capture_kinds.get(*name).copied())
            .collect::<Vec<_>>();

        Ok(Self {
            config,
            parser,
            query,
            capture_kinds,
        })
    }

    /// The configuration this parser was built from.
    pub fn config(&self) -> &TreeSitterStructureConfig {
        &self.config
    }

    fn collect_spans(&self, tree: &Tree, text: &str, index: &OffsetIndex) -> Vec<CapturedSpan> {
        let mut cursor = QueryCursor::new();
        let root = tree.root_node();
        let mut spans = Vec::<CapturedSpan>::new();

        let mut matches = cursor.matches(&self.query, root, text.as_bytes());
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let idx = capture.index as usize;
                let Some(kind) = self.capture_kinds.get(idx).and_then(|x| *x) else {
                    continue;
                };

                let node = capture.node;
                let start = index.byte_to_char(node.start_byte());
                let end = index.byte_to_char(node.end_byte());
                if end <= start {
                    continue;
                }

                spans.push(CapturedSpan { start, end, kind });
            }
        }

        // Outer-before-inner: by start, longest range first. The sort is
        // stable, so equal ranges keep query order and dedup keeps the first.
        spans.sort_by_key(|s| (s.start, Reverse(s.end)));
        spans.dedup_by(|a, b| a.start == b.start && a.end == b.end);
        spans
    }

    fn assemble(
        spans: Vec<CapturedSpan>,
        document_len: usize,
    ) -> Result<SpanNode, TreeSitterStructureError> {
        let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, document_len);
        let mut open_ends: Vec<usize> = Vec::new();

        for span in spans {
            while let Some(&end) = open_ends.last() {
                if end <= span.start {
                    builder.close()?;
                    open_ends.pop();
                } else {
                    break;
                }
            }

            if let Some(&end) = open_ends.last() {
                if span.end > end {
                    // Straddles the enclosing capture. Tree-sitter node
                    // ranges nest, so this only happens with queries that
                    // capture disjoint fragments; skip rather than guess.
                    continue;
                }
            }

            builder.open(span.kind, span.start, span.end)?;
            open_ends.push(span.end);
        }

        while open_ends.pop().is_some() {
            builder.close()?;
        }

        Ok(builder.finish()?)
    }
}

impl StructureParser for TreeSitterStructureParser {
    type Error = TreeSitterStructureError;

    fn parse(&mut self, text: &str) -> Result<SpanNode, Self::Error> {
        let index = OffsetIndex::from_text(text);
        let tree = self
            .parser
            .parse(text, None)
            .ok_or(TreeSitterStructureError::ParseFailed)?;

        let spans = self.collect_spans(&tree, text, &index);
        Self::assemble(spans, index.char_count())
    }
}
