//! Text edit descriptions.
//!
//! A [`TextEdit`] records one document mutation as the removed and inserted
//! text at a character offset. Carrying the text rather than bare lengths
//! keeps edits self-describing and trivially invertible, and lets callers
//! forward the same value to other consumers of document changes.

/// A single text mutation at a character offset.
///
/// All offsets and lengths are measured in characters, not bytes. A
/// replacement is modeled as removing `deleted_text` and inserting
/// `inserted_text` at the same `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Character offset where the edit applies.
    pub start: usize,
    /// Text removed at `start` (empty for a pure insertion).
    pub deleted_text: String,
    /// Text inserted at `start` (empty for a pure removal).
    pub inserted_text: String,
}

impl TextEdit {
    /// An insertion of `text` at `start`.
    pub fn insertion(start: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            deleted_text: String::new(),
            inserted_text: text.into(),
        }
    }

    /// A removal of `text` at `start`.
    pub fn removal(start: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            deleted_text: text.into(),
            inserted_text: String::new(),
        }
    }

    /// A replacement of `deleted` by `inserted` at `start`.
    pub fn replacement(
        start: usize,
        deleted: impl Into<String>,
        inserted: impl Into<String>,
    ) -> Self {
        Self {
            start,
            deleted_text: deleted.into(),
            inserted_text: inserted.into(),
        }
    }

    /// Number of characters removed.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Number of characters inserted.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Character offset one past the removed span.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }

    /// Returns `true` if the edit neither removes nor inserts anything.
    pub fn is_empty(&self) -> bool {
        self.deleted_text.is_empty() && self.inserted_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_constructors() {
        let insert = TextEdit::insertion(5, "abc");
        assert_eq!(insert.inserted_len(), 3);
        assert_eq!(insert.deleted_len(), 0);
        assert_eq!(insert.end(), 5);

        let remove = TextEdit::removal(2, "xy");
        assert_eq!(remove.deleted_len(), 2);
        assert_eq!(remove.end(), 4);

        let replace = TextEdit::replacement(0, "old", "newer");
        assert_eq!(replace.deleted_len(), 3);
        assert_eq!(replace.inserted_len(), 5);
        assert!(!replace.is_empty());
        assert!(TextEdit::insertion(9, "").is_empty());
    }

    #[test]
    fn test_lengths_are_characters_not_bytes() {
        let edit = TextEdit::replacement(0, "中文", "日本語");
        assert_eq!(edit.deleted_len(), 2);
        assert_eq!(edit.inserted_len(), 3);
        assert_eq!(edit.end(), 2);
    }
}
