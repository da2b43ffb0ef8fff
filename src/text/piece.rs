//! Spans referencing a range of one of the piece table's buffers.

use crate::decoration::{Decoration, ParagraphDecoration};
use crate::text::unit_buffer::UnitBuffer;
use std::ops::Range;

/// Which buffer a piece refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// The buffer fixed when the document was opened.
    Original,
    /// The append-only buffer of inserted content.
    Addition,
}

/// An immutable reference to `start..start + len` (internal offsets) of one
/// buffer, with its decorations.
///
/// Pieces never point back at their table; editing replaces pieces in the
/// table's list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    source: Source,
    start: usize,
    len: usize,
    external_len: usize,
    decoration: Decoration,
    paragraph: ParagraphDecoration,
}

impl Piece {
    /// Create a piece over `range` of `buffer`.
    pub(crate) fn new(
        source: Source,
        range: Range<usize>,
        buffer: &UnitBuffer,
        decoration: Decoration,
        paragraph: ParagraphDecoration,
    ) -> Self {
        Self {
            source,
            start: range.start,
            len: range.len(),
            external_len: buffer.external_len_of(range),
            decoration,
            paragraph,
        }
    }

    /// The referenced buffer.
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Internal start offset within the buffer.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Internal length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// External (visible) length.
    #[must_use]
    pub const fn external_len(&self) -> usize {
        self.external_len
    }

    /// Internal range within the buffer.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Character-level decoration.
    #[must_use]
    pub const fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    /// Paragraph decoration.
    #[must_use]
    pub const fn paragraph(&self) -> &ParagraphDecoration {
        &self.paragraph
    }

    /// Split at a local internal offset. Both halves keep the decorations.
    pub(crate) fn split(&self, at: usize, buffer: &UnitBuffer) -> (Self, Self) {
        debug_assert!(at > 0 && at < self.len, "split inside piece");
        let middle = self.start + at;
        (
            self.with_range(self.start..middle, buffer),
            self.with_range(middle..self.start + self.len, buffer),
        )
    }

    fn with_range(&self, range: Range<usize>, buffer: &UnitBuffer) -> Self {
        Self::new(
            self.source,
            range,
            buffer,
            self.decoration.clone(),
            self.paragraph.clone(),
        )
    }

    /// Copy with new decorations.
    pub(crate) fn restyled(&self, decoration: Decoration, paragraph: ParagraphDecoration) -> Self {
        Self {
            decoration,
            paragraph,
            ..self.clone()
        }
    }

    /// Whether `next` continues this piece in the same buffer with the same
    /// decorations.
    pub(crate) fn can_merge(&self, next: &Self) -> bool {
        self.source == next.source
            && self.start + self.len == next.start
            && self.decoration == next.decoration
            && self.paragraph == next.paragraph
    }

    /// Extend by a following mergeable piece.
    pub(crate) fn merge(&mut self, next: &Self) {
        debug_assert!(self.can_merge(next));
        self.len += next.len;
        self.external_len += next.external_len;
    }
}
