//! Character, byte and line/column offset conversions.
//!
//! The node tree measures everything in characters, while external parsers
//! and text buffers frequently speak bytes or line/column pairs. The
//! [`OffsetIndex`] wraps a rope to translate between the three without
//! rescanning the document on every conversion.

use ropey::Rope;

/// A document snapshot indexed for offset conversions.
///
/// All conversion methods clamp out-of-range inputs to the document bounds
/// rather than panicking; edits that race ahead of the index then degrade to
/// end-of-document positions instead of taking the host down.
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    rope: Rope,
}

impl OffsetIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index over `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Document length in characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Document length in bytes.
    pub fn byte_count(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Number of lines, counting the final unterminated line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Convert a character offset to a byte offset.
    pub fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.rope.len_chars());
        self.rope.char_to_byte(clamped)
    }

    /// Convert a byte offset to a character offset.
    ///
    /// A byte offset inside a multi-byte character maps to that character.
    pub fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.rope.len_bytes());
        self.rope.byte_to_char(clamped)
    }

    /// Convert a character offset to a zero-based `(line, column)` pair.
    pub fn char_to_position(&self, char_offset: usize) -> (usize, usize) {
        let clamped = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        let column = clamped - self.rope.line_to_char(line);
        (line, column)
    }

    /// Convert a zero-based `(line, column)` pair to a character offset.
    ///
    /// Returns `None` for a line past the document; a column past the line's
    /// end clamps to the end of that line.
    pub fn position_to_char(&self, line: usize, column: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let line_start = self.rope.line_to_char(line);
        let line_len = self.rope.line(line).len_chars();
        Some(line_start + column.min(line_len))
    }

    /// The text of one line without its trailing line break.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let text: String = self.rope.line(line).chars().collect();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// The full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert `text` at a character offset, clamped to the document end.
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let clamped = char_offset.min(self.rope.len_chars());
        self.rope.insert(clamped, text);
    }

    /// Remove `len` characters starting at a character offset.
    ///
    /// The range is clamped to the document bounds.
    pub fn remove(&mut self, start: usize, len: usize) {
        let total = self.rope.len_chars();
        let start = start.min(total);
        let end = start.saturating_add(len).min(total);
        self.rope.remove(start..end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_byte_round_trip_with_cjk() {
        let index = OffsetIndex::from_text("fn 测试() {}\n");

        // "fn " is 3 bytes, each CJK character is 3 bytes.
        assert_eq!(index.char_to_byte(3), 3);
        assert_eq!(index.char_to_byte(5), 9);
        assert_eq!(index.byte_to_char(9), 5);
        // Mid-character byte offsets land on the containing character.
        assert_eq!(index.byte_to_char(4), 3);
    }

    #[test]
    fn test_line_and_column_conversions() {
        let index = OffsetIndex::from_text("first\nsecond\nthird");

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.char_to_position(0), (0, 0));
        assert_eq!(index.char_to_position(8), (1, 2));
        assert_eq!(index.position_to_char(1, 2), Some(8));
        assert_eq!(index.position_to_char(2, 100), Some(18)); // clamped column
        assert_eq!(index.position_to_char(5, 0), None);
    }

    #[test]
    fn test_line_text_strips_line_breaks() {
        let index = OffsetIndex::from_text("alpha\r\nbeta\n");
        assert_eq!(index.line_text(0).as_deref(), Some("alpha"));
        assert_eq!(index.line_text(1).as_deref(), Some("beta"));
        assert_eq!(index.line_text(2).as_deref(), Some(""));
        assert!(index.line_text(3).is_none());
    }

    #[test]
    fn test_edits_and_clamping() {
        let mut index = OffsetIndex::from_text("hello");
        index.insert(100, "!"); // clamps to the end
        assert_eq!(index.text(), "hello!");

        index.remove(4, 50); // clamps to the end
        assert_eq!(index.text(), "hell");
        assert_eq!(index.char_count(), 4);

        assert_eq!(index.char_to_byte(99), 4);
        assert_eq!(index.char_to_position(99), (0, 4));
    }
}
