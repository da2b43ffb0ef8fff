//! Lazy traversal of a piece table's content.

use crate::decoration::{Decoration, ParagraphDecoration};
use crate::text::piece::{Piece, Source};
use crate::text::piece_table::PieceTable;
use crate::text::unit::{EmojiUnit, ObjectUnit, Unit, slice_chars};
use crate::text::unit_buffer::UnitSlices;
use std::borrow::Cow;
use std::ops::Range;

/// Content of a fragment, borrowed from the table's buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentContent<'a> {
    Text(&'a str),
    Emoji(&'a EmojiUnit),
    Object(&'a ObjectUnit),
}

/// A maximal run of one unit kind within one piece.
///
/// Text fragments may be partial units when the requested range cuts a text
/// unit; emoji and object fragments are always whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub content: FragmentContent<'a>,
    pub decoration: &'a Decoration,
    pub paragraph: &'a ParagraphDecoration,
    /// Absolute internal range in the document.
    pub range: Range<usize>,
}

impl<'a> Fragment<'a> {
    /// Visible text of the fragment.
    #[must_use]
    pub fn external_text(&self) -> Cow<'a, str> {
        match self.content {
            FragmentContent::Text(text) => Cow::Borrowed(text),
            FragmentContent::Emoji(emoji) => Cow::Borrowed(emoji.grapheme()),
            FragmentContent::Object(object) => Cow::Owned(object.placeholder()),
        }
    }

    /// Whether the fragment is an emoji or embedded object.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        !matches!(self.content, FragmentContent::Text(_))
    }

    /// Internal length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Clone, Debug)]
struct ActivePiece<'a> {
    piece: &'a Piece,
    piece_start: usize,
    slices: UnitSlices<'a>,
}

/// Iterator returned by [`PieceTable::fragments`].
#[derive(Clone, Debug)]
pub struct Fragments<'a> {
    table: &'a PieceTable,
    index: usize,
    piece_start: usize,
    range: Range<usize>,
    active: Option<ActivePiece<'a>>,
}

impl<'a> Fragments<'a> {
    pub(crate) const fn new(
        table: &'a PieceTable,
        index: usize,
        piece_start: usize,
        range: Range<usize>,
    ) -> Self {
        Self {
            table,
            index,
            piece_start,
            range,
            active: None,
        }
    }

    /// Open the next piece overlapping the range.
    fn advance_piece(&mut self) -> bool {
        let pieces = self.table.pieces();
        while let Some(piece) = pieces.get(self.index) {
            let piece_start = self.piece_start;
            let piece_end = piece_start + piece.len();
            self.index += 1;
            self.piece_start = piece_end;
            if piece_start >= self.range.end {
                return false;
            }
            let from = self.range.start.max(piece_start) - piece_start;
            let to = self.range.end.min(piece_end) - piece_start;
            if from < to {
                let buffer = match piece.source() {
                    Source::Original => self.table.original(),
                    Source::Addition => self.table.addition(),
                };
                self.active = Some(ActivePiece {
                    piece,
                    piece_start,
                    slices: buffer.slices(piece.start() + from..piece.start() + to),
                });
                return true;
            }
        }
        false
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(active) = &mut self.active {
                if let Some(slice) = active.slices.next() {
                    let start = active.piece_start + slice.offset - active.piece.start();
                    let content = match slice.unit {
                        Unit::Text(text) => {
                            FragmentContent::Text(slice_chars(text, slice.range.0, slice.range.1))
                        }
                        Unit::Emoji(emoji) => FragmentContent::Emoji(emoji),
                        Unit::Object(object) => FragmentContent::Object(object),
                    };
                    return Some(Fragment {
                        content,
                        decoration: active.piece.decoration(),
                        paragraph: active.piece.paragraph(),
                        range: start..start + slice.len(),
                    });
                }
                self.active = None;
            }
            if !self.advance_piece() {
                return None;
            }
        }
    }
}
