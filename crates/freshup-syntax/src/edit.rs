//! Ordered byte-range text edits
//!
//! Tree-sitter trees are immutable, so rewrites are recorded as edits against
//! the original text and spliced in one pass. Zero-width insertions at the
//! same offset keep the order they were recorded in.

use crate::error::{SyntaxError, SyntaxResult};
use std::ops::Range;

/// A single replacement of `range` by `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte range in the original text
    pub range: Range<usize>,
    /// Replacement text
    pub text: String,
    seq: usize,
}

/// Collection of edits recorded against one source text
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    /// Create empty edit set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `range` with `text`
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        let seq = self.edits.len();
        self.edits.push(TextEdit {
            range,
            text: text.into(),
            seq,
        });
    }

    /// Insert `text` at byte offset `at`
    #[inline]
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    /// Remove `range`
    #[inline]
    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, String::new());
    }

    /// Number of recorded edits
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Check whether nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of edits recorded so far, usable as a rollback mark
    #[inline]
    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.edits.len()
    }

    /// Drop every edit recorded after `mark`
    #[inline]
    pub fn rollback(&mut self, mark: usize) {
        self.edits.truncate(mark);
    }

    /// Splice all edits into `source`
    ///
    /// # Errors
    /// `SyntaxError::OverlappingEdit` if two non-empty ranges intersect.
    pub fn apply(&self, source: &str) -> SyntaxResult<String> {
        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.range.start, e.range.end, e.seq));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        let mut previous: Option<&TextEdit> = None;

        for edit in ordered {
            if let Some(prev) = previous {
                if edit.range.start < prev.range.end {
                    return Err(SyntaxError::OverlappingEdit {
                        first: prev.range.clone(),
                        second: edit.range.clone(),
                    });
                }
            }
            out.push_str(&source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
            previous = Some(edit);
        }

        out.push_str(&source[cursor..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_set_is_identity() {
        let edits = EditSet::new();
        assert!(edits.is_empty());
        assert_eq!(edits.apply("abc").unwrap(), "abc");
    }

    #[test]
    fn replace_insert_delete() {
        let mut edits = EditSet::new();
        edits.replace(0..3, "ctx");
        edits.insert(4, "info.");
        edits.delete(14..15);
        assert_eq!(edits.apply("req.remoteAddr;").unwrap(), "ctx.info.remoteAddr");
    }

    #[test]
    fn insertions_at_same_offset_keep_order() {
        let mut edits = EditSet::new();
        edits.insert(1, "a");
        edits.insert(1, "b");
        assert_eq!(edits.apply("{}").unwrap(), "{ab}");
    }

    #[test]
    fn insertion_at_replacement_end_follows_it() {
        let mut edits = EditSet::new();
        edits.insert(12, ", req");
        edits.replace(2..12, "info");
        assert_eq!(edits.apply("{ remoteAddr }").unwrap(), "{ info, req }");
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let mut edits = EditSet::new();
        edits.replace(0..5, "x");
        edits.replace(3..7, "y");
        let err = edits.apply("0123456789").unwrap_err();
        assert!(matches!(err, SyntaxError::OverlappingEdit { .. }));
    }

    #[test]
    fn rollback_discards_later_edits() {
        let mut edits = EditSet::new();
        edits.insert(0, "a");
        let mark = edits.checkpoint();
        edits.insert(0, "b");
        edits.rollback(mark);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.apply("-").unwrap(), "a-");
    }

    proptest! {
        #[test]
        fn insertions_keep_original_bytes_in_order(
            source in "[a-z ;.]{0,40}",
            inserts in proptest::collection::vec((any::<prop::sample::Index>(), "[A-Z]{1,3}"), 0..8),
        ) {
            let mut edits = EditSet::new();
            let mut added = 0;
            for (at, text) in &inserts {
                edits.insert(at.index(source.len() + 1), text.as_str());
                added += text.len();
            }
            let out = edits.apply(&source).unwrap();
            prop_assert_eq!(out.len(), source.len() + added);
            let kept: String = out.chars().filter(|c| !c.is_ascii_uppercase()).collect();
            prop_assert_eq!(kept, source);
        }
    }
}
