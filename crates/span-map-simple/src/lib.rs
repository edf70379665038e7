//! `span-map-simple` - Regex-based structure parsing for `span-map`.
//!
//! This crate is intended for quick setups where wiring up a real grammar is
//! unnecessary: a list of line-oriented header rules, each optionally owning
//! the `{...}` block that follows it. Brace matching is textual and does not
//! understand strings or comments, so treat it as a sketch of the structure
//! rather than a parser.

use regex::Regex;
use span_map::{BuildError, NodeKind, OffsetIndex, SpanNode, StructureParser, TreeBuilder};
use std::fmt;

/// Errors produced while sketching the structure of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleParseError {
    /// An opening brace without a matching close.
    UnbalancedBlock {
        /// Character offset of the unmatched `{`.
        offset: usize,
    },
    /// The collected spans did not form a valid tree.
    Build(BuildError),
}

impl fmt::Display for SimpleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleParseError::UnbalancedBlock { offset } => {
                write!(f, "unbalanced block opened at offset {offset}")
            }
            SimpleParseError::Build(err) => write!(f, "invalid structure: {err}"),
        }
    }
}

impl std::error::Error for SimpleParseError {}

impl From<BuildError> for SimpleParseError {
    fn from(err: BuildError) -> Self {
        SimpleParseError::Build(err)
    }
}

/// A single line-matching rule.
///
/// A `block` rule claims everything from its match through the matching close
/// of the first `{` on the line; when the line has no brace the rule degrades
/// to a single-line node. A `line` rule always produces a single-line node.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    regex: Regex,
    kind: NodeKind,
    takes_block: bool,
    capture_group: Option<usize>,
}

impl HeaderRule {
    pub fn block(pattern: &str, kind: NodeKind) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            kind,
            takes_block: true,
            capture_group: None,
        })
    }

    pub fn line(pattern: &str, kind: NodeKind) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            kind,
            takes_block: false,
            capture_group: None,
        })
    }

    /// Start the node at a capture group of the match instead of the whole
    /// match.
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// A structure parser driven by an ordered rule list.
///
/// Rules are tried per line in order; the first match wins. Lines no rule
/// matches stay unparsed gap, which is what lets the host patch edits on them
/// without consulting this parser.
#[derive(Debug, Clone)]
pub struct SimpleStructureParser {
    rules: Vec<HeaderRule>,
}

impl SimpleStructureParser {
    pub fn new(rules: Vec<HeaderRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[HeaderRule] {
        &self.rules
    }

    /// Rules for Rust-shaped code: comments, fn blocks, type blocks, consts
    /// and let statements.
    pub fn rust_like() -> Result<Self, regex::Error> {
        Ok(Self::new(vec![
            HeaderRule::line(r"^\s*//", NodeKind::Comment)?,
            HeaderRule::block(
                r"^\s*(?:pub(?:\(crate\))?\s+)?(?:async\s+)?fn\s+\w+",
                NodeKind::Method,
            )?,
            HeaderRule::block(
                r"^\s*(?:pub(?:\(crate\))?\s+)?(?:struct|enum|union|trait|impl|mod)\b",
                NodeKind::TypeDefinition,
            )?,
            HeaderRule::line(r"^\s*(?:pub\s+)?(?:static|const)\s+\w+", NodeKind::Field)?,
            HeaderRule::line(r"^\s*let\s+", NodeKind::Statement)?,
        ]))
    }

    fn match_line<'r>(&'r self, line_text: &str) -> Option<(&'r HeaderRule, usize)> {
        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(line_text) else {
                continue;
            };
            let group = rule.capture_group.unwrap_or(0);
            let Some(m) = caps.get(group) else {
                continue;
            };
            return Some((rule, m.start()));
        }
        None
    }

    fn scan_region(
        &self,
        builder: &mut TreeBuilder,
        chars: &[char],
        index: &OffsetIndex,
        start_line: usize,
        region_end: usize,
    ) -> Result<(), SimpleParseError> {
        let mut line = start_line;
        while line < index.line_count() {
            let Some(line_start) = index.position_to_char(line, 0) else {
                break;
            };
            if line_start >= region_end {
                break;
            }
            let Some(line_text) = index.line_text(line) else {
                break;
            };

            let Some((rule, start_byte)) = self.match_line(&line_text) else {
                line += 1;
                continue;
            };
            let node_start = line_start + line_text[..start_byte].chars().count();
            let line_end = (line_start + line_text.chars().count()).min(region_end);
            if node_start >= line_end {
                line += 1;
                continue;
            }

            let brace_at = rule
                .takes_block
                .then(|| find_open_brace(&line_text, start_byte).map(|col| line_start + col))
                .flatten();

            match brace_at {
                Some(open) => {
                    let close = match_brace(chars, open)?;
                    builder.open(rule.kind(), node_start, close + 1)?;
                    self.scan_region(builder, chars, index, line + 1, close)?;
                    builder.close()?;
                    let (close_line, _) = index.char_to_position(close);
                    line = close_line + 1;
                }
                None => {
                    builder.leaf(rule.kind(), node_start, line_end)?;
                    line += 1;
                }
            }
        }
        Ok(())
    }
}

impl StructureParser for SimpleStructureParser {
    type Error = SimpleParseError;

    fn parse(&mut self, text: &str) -> Result<SpanNode, SimpleParseError> {
        let chars: Vec<char> = text.chars().collect();
        let index = OffsetIndex::from_text(text);
        let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, chars.len());
        self.scan_region(&mut builder, &chars, &index, 0, chars.len())?;
        builder.finish().map_err(SimpleParseError::from)
    }
}

/// Character column of the first `{` at or after a byte position.
fn find_open_brace(line_text: &str, from_byte: usize) -> Option<usize> {
    let brace_byte = from_byte + line_text[from_byte..].find('{')?;
    Some(line_text[..brace_byte].chars().count())
}

/// Character offset of the `}` matching the `{` at `open_at`.
fn match_brace(chars: &[char], open_at: usize) -> Result<usize, SimpleParseError> {
    let mut depth = 0usize;
    for (i, &ch) in chars.iter().enumerate().skip(open_at) {
        if ch == '{' {
            depth += 1;
        } else if ch == '}' {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Ok(i);
            }
        }
    }
    Err(SimpleParseError::UnbalancedBlock { offset: open_at })
}
