//! Piece-table document model.
//!
//! A [`PieceTable`] keeps the text the document was opened with in an
//! immutable *original* buffer and everything typed or pasted since in an
//! append-only *addition* buffer. The document itself is the ordered list of
//! [`Piece`]s, each naming a range of one buffer plus its decorations.
//!
//! # Offsets
//!
//! Public positions are *external*: `char` indices into the visible text.
//! Internally every emoji and embedded object occupies a single slot, so an
//! external position may fall inside one. The policy is:
//!
//! - `insert` inside an atomic unit inserts before it
//! - `delete`, `decorate` and `text_range` round outward, consuming or
//!   including the whole unit
//!
//! # Canonical form
//!
//! After every mutation neighbouring pieces that continue each other in the
//! same buffer with equal decorations are merged, and no piece is empty. With
//! this invariant restoring the removed pieces of an edit reproduces the
//! previous piece list exactly, which is what undo relies on.
//!
//! # Examples
//!
//! ```
//! use pieceweave::PieceTable;
//!
//! let mut table = PieceTable::with_text("Emoji: 😀!");
//! assert_eq!(table.text_len(), 9);
//!
//! table.insert(" smiley", 5).unwrap();
//! assert_eq!(table.text(), "Emoji smiley: 😀!");
//!
//! table.delete(14, 1).unwrap();
//! assert_eq!(table.text(), "Emoji smiley: !");
//! ```

use crate::decoration::{Decoration, ParagraphDecoration};
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ChangeListeners, ListenerId};
use crate::text::document::{DecorationModel, Document};
use crate::text::fragment::{Fragment, Fragments};
use crate::text::piece::{Piece, Source};
use crate::text::table::Table;
use crate::text::unit_buffer::{Bias, UnitBuffer};
use std::ops::Range;
use tracing::{debug, trace};

/// What an edit changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditKind {
    /// Content was inserted and/or removed.
    Text,
    /// Only decorations changed.
    Style,
}

/// Inverse data of one mutation: the pieces covering internal range
/// `start..start + |removed|` were replaced by `inserted`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EditRecord {
    start: usize,
    removed: Vec<Piece>,
    inserted: Vec<Piece>,
    kind: EditKind,
}

impl EditRecord {
    const fn empty(start: usize, kind: EditKind) -> Self {
        Self {
            start,
            removed: Vec::new(),
            inserted: Vec::new(),
            kind,
        }
    }

    /// Whether the edit changed nothing.
    pub(crate) fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }

    fn removed_len(&self) -> usize {
        self.removed.iter().map(Piece::len).sum()
    }

    fn inserted_len(&self) -> usize {
        self.inserted.iter().map(Piece::len).sum()
    }
}

/// Location of a piece in the list.
#[derive(Clone, Copy, Debug)]
struct Location {
    index: usize,
    internal_start: usize,
    external_start: usize,
}

/// A coalesced run of equally decorated text; see [`PieceTable::styled_runs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub decoration: Decoration,
    pub paragraph: ParagraphDecoration,
}

/// The live document representation.
#[derive(Debug)]
pub struct PieceTable {
    original: UnitBuffer,
    addition: UnitBuffer,
    pieces: Vec<Piece>,
    internal_len: usize,
    external_len: usize,
    default_decoration: Decoration,
    default_paragraph: ParagraphDecoration,
    listeners: ChangeListeners,
    revision: u64,
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            original: UnitBuffer::new(),
            addition: UnitBuffer::new(),
            pieces: Vec::new(),
            internal_len: 0,
            external_len: 0,
            default_decoration: Decoration::default(),
            default_paragraph: ParagraphDecoration::presets(),
            listeners: ChangeListeners::new(),
            revision: 0,
        }
    }

    /// Create a table over text with default decorations.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut table = Self::new();
        table.original = UnitBuffer::from_text(text);
        let range = 0..table.original.len();
        if !range.is_empty() {
            let piece = Piece::new(
                Source::Original,
                range,
                &table.original,
                table.default_decoration.clone(),
                table.default_paragraph.clone(),
            );
            table.pieces.push(piece);
        }
        table.internal_len = table.original.len();
        table.external_len = table.original.external_len();
        table
    }

    /// Open a document, seeding the piece list from its decoration models.
    ///
    /// Models may leave gaps (filled with default decorations) but must be
    /// non-overlapping, lie within the text, and carry a character-level
    /// decoration. Model boundaries inside an emoji round to its start.
    pub fn from_document(document: &Document) -> Result<Self> {
        Self::from_document_with_defaults(
            document,
            Decoration::default(),
            ParagraphDecoration::presets(),
        )
    }

    /// Open a document, filling gaps and unset decoration fields from the
    /// given defaults instead of the presets.
    pub fn from_document_with_defaults(
        document: &Document,
        decoration: Decoration,
        paragraph: ParagraphDecoration,
    ) -> Result<Self> {
        let mut table = Self::new();
        table.default_decoration = decoration;
        table.default_paragraph = paragraph;
        table.original = UnitBuffer::from_text(&document.text);
        let text_len = table.original.external_len();

        let mut models: Vec<&DecorationModel> = document.decorations.iter().collect();
        models.sort_by_key(|model| model.start);

        let mut cursor = 0;
        for model in models {
            if model.end() > text_len {
                return Err(Error::InvalidDocument(format!(
                    "decoration {}..{} exceeds text length {text_len}",
                    model.start,
                    model.end()
                )));
            }
            if model.start < cursor {
                return Err(Error::InvalidDocument(format!(
                    "decoration {}..{} overlaps previous decoration ending at {cursor}",
                    model.start,
                    model.end()
                )));
            }
            if model.decoration.is_block() {
                return Err(Error::InvalidDocument(format!(
                    "decoration {}..{} must be character-level",
                    model.start,
                    model.end()
                )));
            }
            if model.start > cursor {
                table.seed_piece(
                    cursor..model.start,
                    table.default_decoration.clone(),
                    table.default_paragraph.clone(),
                );
            }
            let decoration = model.decoration.normalize(&table.default_decoration);
            let paragraph = model.paragraph.normalize(&table.default_paragraph);
            table.seed_piece(model.start..model.end(), decoration, paragraph);
            cursor = model.end();
        }
        if cursor < text_len {
            table.seed_piece(
                cursor..text_len,
                table.default_decoration.clone(),
                table.default_paragraph.clone(),
            );
        }

        table.internal_len = table.original.len();
        table.external_len = text_len;
        let count = table.pieces.len();
        table.coalesce(0, count);
        debug!(
            pieces = table.pieces.len(),
            len = table.external_len,
            "opened document"
        );
        Ok(table)
    }

    fn seed_piece(
        &mut self,
        external: Range<usize>,
        decoration: Decoration,
        paragraph: ParagraphDecoration,
    ) {
        let start = self
            .original
            .external_to_internal(external.start, Bias::Left);
        let end = self.original.external_to_internal(external.end, Bias::Left);
        if start < end {
            let piece = Piece::new(
                Source::Original,
                start..end,
                &self.original,
                decoration,
                paragraph,
            );
            self.pieces.push(piece);
        }
    }

    /// Snapshot the current text and decoration layout.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut decorations: Vec<DecorationModel> = Vec::new();
        let mut start = 0;
        for run in self.styled_runs() {
            let length = run.text.chars().count();
            decorations.push(DecorationModel::new(
                start,
                length,
                run.decoration,
                run.paragraph,
            ));
            start += length;
        }
        Document {
            text: self.text(),
            decorations,
            caret_position: 0,
        }
    }

    /// Coalesced runs of equally decorated text, independent of piece
    /// boundaries.
    #[must_use]
    pub fn styled_runs(&self) -> Vec<StyledRun> {
        let mut runs: Vec<StyledRun> = Vec::new();
        for piece in &self.pieces {
            let text = self.piece_text(piece);
            match runs.last_mut() {
                Some(run)
                    if run.decoration == *piece.decoration()
                        && run.paragraph == *piece.paragraph() =>
                {
                    run.text.push_str(&text);
                }
                _ => runs.push(StyledRun {
                    text,
                    decoration: piece.decoration().clone(),
                    paragraph: piece.paragraph().clone(),
                }),
            }
        }
        runs
    }

    /// Set the decoration used where nothing can be inherited.
    pub fn set_default_decoration(&mut self, decoration: Decoration) {
        self.default_decoration = decoration;
    }

    /// Set the paragraph decoration used where nothing can be inherited.
    pub fn set_default_paragraph(&mut self, paragraph: ParagraphDecoration) {
        self.default_paragraph = paragraph;
    }

    /// Default character decoration.
    #[must_use]
    pub const fn default_decoration(&self) -> &Decoration {
        &self.default_decoration
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// External length of the text.
    #[must_use]
    pub const fn text_len(&self) -> usize {
        self.external_len
    }

    /// Internal length (storage slots).
    #[must_use]
    pub const fn internal_len(&self) -> usize {
        self.internal_len
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.internal_len == 0
    }

    /// The full visible text.
    #[must_use]
    pub fn text(&self) -> String {
        self.pieces.iter().map(|piece| self.piece_text(piece)).collect()
    }

    /// The full storage text, with placeholders for atomic units.
    #[must_use]
    pub fn internal_text(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| self.buffer(piece.source()).internal_text_of(piece.range()))
            .collect()
    }

    /// Visible text of the external range `start..end`.
    ///
    /// A boundary inside an emoji or object rounds outward so the whole unit
    /// is included.
    pub fn text_range(&self, start: usize, end: usize) -> Result<String> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(String::new());
        }
        let from = self.external_to_internal(start, Bias::Left);
        let to = self.external_to_internal(end, Bias::Right);
        Ok(self
            .fragments(from..to)
            .map(|fragment| fragment.external_text())
            .collect())
    }

    /// Translate an external position to an internal offset.
    ///
    /// Positions inside an atomic unit round according to `bias`; positions
    /// past the end clamp to [`internal_len`](Self::internal_len).
    #[must_use]
    pub fn internal_position(&self, position: usize, bias: Bias) -> usize {
        self.external_to_internal(position, bias)
    }

    /// Translate an internal offset to an external position.
    #[must_use]
    pub fn external_position(&self, offset: usize) -> usize {
        self.internal_to_external(offset)
    }

    /// The piece list.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The buffer fixed at open time.
    #[must_use]
    pub const fn original(&self) -> &UnitBuffer {
        &self.original
    }

    /// The append-only buffer.
    #[must_use]
    pub const fn addition(&self) -> &UnitBuffer {
        &self.addition
    }

    /// Visible text of a piece.
    #[must_use]
    pub fn piece_text(&self, piece: &Piece) -> String {
        self.buffer(piece.source()).external_text_of(piece.range())
    }

    /// Revision counter, bumped by every mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Lazily iterate the fragments covering an internal range.
    ///
    /// The range is clamped to the document. The iterator borrows the table,
    /// so the document cannot change while it is alive; clone it to restart.
    #[must_use]
    pub fn fragments(&self, range: Range<usize>) -> Fragments<'_> {
        let end = range.end.min(self.internal_len);
        let start = range.start.min(end);
        let location = self.locate(start);
        Fragments::new(
            self,
            location.index,
            location.internal_start,
            start..end,
        )
    }

    /// Call `callback` for each fragment of the internal range `start..end`.
    pub fn walk_fragments<F>(&self, start: usize, end: usize, mut callback: F) -> Result<()>
    where
        F: FnMut(&Fragment<'_>),
    {
        if start > end || end > self.internal_len {
            return Err(Error::InvalidRange {
                start,
                end,
                len: self.internal_len,
            });
        }
        for fragment in self.fragments(start..end) {
            callback(&fragment);
        }
        Ok(())
    }

    /// The table of the paragraph containing an internal offset, if that
    /// paragraph carries a table decoration.
    #[must_use]
    pub fn table_at(&self, offset: usize) -> Option<Table> {
        if self.pieces.is_empty() {
            return None;
        }
        let anchor = offset.min(self.internal_len.saturating_sub(1));
        let location = self.locate(anchor);
        let decoration = self.pieces.get(location.index)?.paragraph().table()?;
        let start = self.paragraph_start_internal(anchor);
        Some(Table::new(
            self,
            start,
            decoration.rows(),
            decoration.columns(),
        ))
    }

    fn paragraph_start_internal(&self, offset: usize) -> usize {
        let text: Vec<char> = self.internal_text().chars().collect();
        let mut start = offset.min(text.len());
        while start > 0 && text[start - 1] != '\n' {
            start -= 1;
        }
        start
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a change listener.
    pub fn add_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.listeners.add(listener)
    }

    /// Remove a change listener. Returns `false` if it was not registered.
    pub fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append text at the end of the document.
    ///
    /// The new text inherits the decorations of the last piece, and typing at
    /// the end extends the trailing addition piece instead of adding pieces.
    pub fn append(&mut self, text: &str) {
        self.insert_internal(self.internal_len, text, None);
    }

    /// Insert text at an external position.
    ///
    /// Inserting at [`text_len`](Self::text_len) is an [`append`](Self::append).
    /// The text inherits the decorations of the preceding character.
    pub fn insert(&mut self, text: &str, position: usize) -> Result<()> {
        self.apply_insert(text, position, None).map(|_| ())
    }

    /// Insert text with a decoration normalized over the inherited one.
    pub fn insert_decorated(
        &mut self,
        text: &str,
        position: usize,
        decoration: &Decoration,
    ) -> Result<()> {
        self.apply_insert(text, position, Some(decoration))
            .map(|_| ())
    }

    /// Delete `length` characters at an external position.
    ///
    /// A length running past the end is clamped. A range touching part of an
    /// emoji or object removes the whole unit.
    pub fn delete(&mut self, position: usize, length: usize) -> Result<()> {
        self.apply_delete(position, length).map(|_| ())
    }

    /// Apply a decoration to the external range `start..end`.
    ///
    /// Paragraph and table decorations extend the range to whole paragraphs.
    pub fn decorate(&mut self, start: usize, end: usize, decoration: &Decoration) -> Result<()> {
        self.apply_decorate(start, end, decoration).map(|_| ())
    }

    pub(crate) fn apply_insert(
        &mut self,
        text: &str,
        position: usize,
        decoration: Option<&Decoration>,
    ) -> Result<EditRecord> {
        self.check_position(position)?;
        let offset = if position == self.external_len {
            self.internal_len
        } else {
            self.external_to_internal(position, Bias::Left)
        };
        Ok(self.insert_internal(offset, text, decoration))
    }

    pub(crate) fn apply_append(&mut self, text: &str) -> EditRecord {
        self.insert_internal(self.internal_len, text, None)
    }

    fn insert_internal(
        &mut self,
        offset: usize,
        text: &str,
        decoration: Option<&Decoration>,
    ) -> EditRecord {
        if text.is_empty() {
            return EditRecord::empty(offset, EditKind::Text);
        }
        let (inherited, paragraph) = self.style_for_insert(offset);
        let (decoration, paragraph) = match decoration {
            Some(decoration) => (
                decoration.normalize(&inherited),
                decoration.normalize_paragraph(&paragraph),
            ),
            None => (inherited, paragraph),
        };

        let range = self.addition.append_text(text);
        let piece = Piece::new(
            Source::Addition,
            range,
            &self.addition,
            decoration,
            paragraph,
        );
        let position = self.internal_to_external(offset);
        debug!(
            position,
            len = piece.external_len(),
            append = (offset == self.internal_len),
            "insert"
        );
        self.splice(offset, offset, vec![piece.clone()]);
        self.listeners.emit(&ChangeEvent::Insert {
            text: text.to_string(),
            position,
        });
        EditRecord {
            start: offset,
            removed: Vec::new(),
            inserted: vec![piece],
            kind: EditKind::Text,
        }
    }

    pub(crate) fn apply_delete(&mut self, position: usize, length: usize) -> Result<EditRecord> {
        self.check_position(position)?;
        let end = position.saturating_add(length).min(self.external_len);
        if end == position {
            return Ok(EditRecord::empty(
                self.external_to_internal(position, Bias::Left),
                EditKind::Text,
            ));
        }
        let from = self.external_to_internal(position, Bias::Left);
        let to = self.external_to_internal(end, Bias::Right);
        let start = self.internal_to_external(from);
        let length = self.internal_to_external(to) - start;

        debug!(position = start, length, "delete");
        let removed = self.splice(from, to, Vec::new());
        self.listeners
            .emit(&ChangeEvent::Delete { position: start, length });
        Ok(EditRecord {
            start: from,
            removed,
            inserted: Vec::new(),
            kind: EditKind::Text,
        })
    }

    pub(crate) fn apply_decorate(
        &mut self,
        start: usize,
        end: usize,
        decoration: &Decoration,
    ) -> Result<EditRecord> {
        self.check_range(start, end)?;
        let (start, end) = if decoration.is_block() {
            self.paragraph_bounds(start, end)
        } else {
            (start, end)
        };
        if start == end {
            return Ok(EditRecord::empty(
                self.external_to_internal(start, Bias::Left),
                EditKind::Style,
            ));
        }
        let from = self.external_to_internal(start, Bias::Left);
        let to = self.external_to_internal(end, Bias::Right);

        let first = self.split_at(from);
        let last = self.split_at(to);
        let restyled: Vec<Piece> = self.pieces[first..last]
            .iter()
            .map(|piece| {
                piece.restyled(
                    decoration.normalize(piece.decoration()),
                    decoration.normalize_paragraph(piece.paragraph()),
                )
            })
            .collect();
        if restyled[..] == self.pieces[first..last] {
            // Nothing changes; undo the boundary splits.
            self.coalesce(first.saturating_sub(1), last + 1);
            trace!(start, end, "decorate leaves styles unchanged");
            return Ok(EditRecord::empty(from, EditKind::Style));
        }

        let external = self.internal_to_external(from)..self.internal_to_external(to);
        debug!(start = external.start, end = external.end, "decorate");
        let removed = self.splice(from, to, restyled.clone());
        self.listeners.emit(&ChangeEvent::Decorate {
            start: external.start,
            end: external.end,
        });
        Ok(EditRecord {
            start: from,
            removed,
            inserted: restyled,
            kind: EditKind::Style,
        })
    }

    /// Undo a recorded edit.
    pub(crate) fn revert(&mut self, record: &EditRecord) {
        let end = record.start + record.inserted_len();
        self.replace_recorded(record.start, end, &record.inserted, &record.removed, record.kind);
    }

    /// Redo a recorded edit with the pieces it produced originally.
    pub(crate) fn reapply(&mut self, record: &EditRecord) {
        let end = record.start + record.removed_len();
        self.replace_recorded(record.start, end, &record.removed, &record.inserted, record.kind);
    }

    fn replace_recorded(
        &mut self,
        start: usize,
        end: usize,
        outgoing: &[Piece],
        incoming: &[Piece],
        kind: EditKind,
    ) {
        let external_start = self.internal_to_external(start);
        let outgoing_len: usize = outgoing.iter().map(Piece::external_len).sum();
        trace!(start, end, incoming = incoming.len(), "replace recorded pieces");
        self.splice(start, end, incoming.to_vec());

        match kind {
            EditKind::Style => {
                let external_end = self.internal_to_external(end);
                self.listeners.emit(&ChangeEvent::Decorate {
                    start: external_start,
                    end: external_end,
                });
            }
            EditKind::Text => {
                if outgoing_len > 0 {
                    self.listeners.emit(&ChangeEvent::Delete {
                        position: external_start,
                        length: outgoing_len,
                    });
                }
                if !incoming.is_empty() {
                    let text: String = incoming.iter().map(|piece| self.piece_text(piece)).collect();
                    self.listeners.emit(&ChangeEvent::Insert {
                        text,
                        position: external_start,
                    });
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Piece list plumbing
    // ------------------------------------------------------------------

    const fn buffer(&self, source: Source) -> &UnitBuffer {
        match source {
            Source::Original => &self.original,
            Source::Addition => &self.addition,
        }
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position > self.external_len {
            return Err(Error::PositionOutOfBounds {
                position,
                len: self.external_len,
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.external_len {
            return Err(Error::InvalidRange {
                start,
                end,
                len: self.external_len,
            });
        }
        Ok(())
    }

    /// Find the piece containing an internal offset. At the end of the
    /// document the index equals the piece count.
    fn locate(&self, offset: usize) -> Location {
        let mut internal_start = 0;
        let mut external_start = 0;
        if offset >= self.internal_len {
            return Location {
                index: self.pieces.len(),
                internal_start: self.internal_len,
                external_start: self.external_len,
            };
        }
        for (index, piece) in self.pieces.iter().enumerate() {
            if offset < internal_start + piece.len() {
                return Location {
                    index,
                    internal_start,
                    external_start,
                };
            }
            internal_start += piece.len();
            external_start += piece.external_len();
        }
        Location {
            index: self.pieces.len(),
            internal_start,
            external_start,
        }
    }

    fn internal_to_external(&self, offset: usize) -> usize {
        if offset >= self.internal_len {
            return self.external_len;
        }
        let location = self.locate(offset);
        let piece = &self.pieces[location.index];
        let buffer = self.buffer(piece.source());
        let local = offset - location.internal_start;
        location.external_start + buffer.internal_to_external(piece.start() + local)
            - buffer.internal_to_external(piece.start())
    }

    fn external_to_internal(&self, position: usize, bias: Bias) -> usize {
        if position >= self.external_len {
            return self.internal_len;
        }
        let mut internal_start = 0;
        let mut external_start = 0;
        for piece in &self.pieces {
            if position < external_start + piece.external_len() {
                let buffer = self.buffer(piece.source());
                let base = buffer.internal_to_external(piece.start());
                let offset = buffer.external_to_internal(base + position - external_start, bias);
                return internal_start + offset.min(piece.range().end) - piece.start();
            }
            internal_start += piece.len();
            external_start += piece.external_len();
        }
        self.internal_len
    }

    /// Decorations for text inserted at an internal offset: those of the
    /// preceding character, or of the first piece at the very start.
    fn style_for_insert(&self, offset: usize) -> (Decoration, ParagraphDecoration) {
        let source = if offset == 0 {
            self.pieces.first()
        } else if offset >= self.internal_len {
            self.pieces.last()
        } else {
            self.pieces.get(self.locate(offset - 1).index)
        };
        source.map_or_else(
            || (self.default_decoration.clone(), self.default_paragraph.clone()),
            |piece| {
                let decoration = match piece.decoration() {
                    Decoration::Image(_) => self.default_decoration.clone(),
                    decoration => decoration.clone(),
                };
                (decoration, piece.paragraph().clone())
            },
        )
    }

    /// Extend an external range to whole paragraphs (each including its
    /// terminating newline).
    fn paragraph_bounds(&self, start: usize, end: usize) -> (usize, usize) {
        let text: Vec<char> = self.text().chars().collect();
        let mut from = start;
        while from > 0 && text[from - 1] != '\n' {
            from -= 1;
        }
        let mut to = end.max(from);
        if !(to > start && text[to - 1] == '\n') {
            while to < text.len() && text[to] != '\n' {
                to += 1;
            }
            if to < text.len() {
                to += 1;
            }
        }
        (from, to)
    }

    /// Ensure a piece boundary at an internal offset. Returns the index of
    /// the first piece starting there.
    fn split_at(&mut self, offset: usize) -> usize {
        if offset == 0 {
            return 0;
        }
        if offset >= self.internal_len {
            return self.pieces.len();
        }
        let location = self.locate(offset);
        let local = offset - location.internal_start;
        if local == 0 {
            return location.index;
        }
        let piece = &self.pieces[location.index];
        let (left, right) = piece.split(local, self.buffer(piece.source()));
        self.pieces[location.index] = left;
        self.pieces.insert(location.index + 1, right);
        location.index + 1
    }

    /// Replace the pieces covering internal `start..end` with `replacement`,
    /// returning the pieces taken out. Restores the canonical form around the
    /// seam.
    fn splice(&mut self, start: usize, end: usize, replacement: Vec<Piece>) -> Vec<Piece> {
        let first = self.split_at(start);
        let last = self.split_at(end);
        let added_internal: usize = replacement.iter().map(Piece::len).sum();
        let added_external: usize = replacement.iter().map(Piece::external_len).sum();
        let added_count = replacement.len();

        let removed: Vec<Piece> = self
            .pieces
            .splice(first..last, replacement.into_iter().filter(|piece| !piece.is_empty()))
            .collect();
        let removed_internal: usize = removed.iter().map(Piece::len).sum();
        let removed_external: usize = removed.iter().map(Piece::external_len).sum();

        self.internal_len = self.internal_len - removed_internal + added_internal;
        self.external_len = self.external_len - removed_external + added_external;
        self.coalesce(first.saturating_sub(1), first + added_count + 1);
        self.revision = self.revision.wrapping_add(1);
        removed
    }

    /// Merge mergeable neighbours among `pieces[from..to]`.
    fn coalesce(&mut self, from: usize, to: usize) {
        let mut index = from;
        let mut end = to.min(self.pieces.len());
        while index + 1 < end {
            if self.pieces[index].can_merge(&self.pieces[index + 1]) {
                let next = self.pieces.remove(index + 1);
                self.pieces[index].merge(&next);
                end -= 1;
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::decoration::{TableDecoration, TextAlignment, TextDecoration};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn red() -> Decoration {
        Decoration::Text(TextDecoration::builder().foreground(Rgba::RED).build())
    }

    fn assert_invariants(table: &PieceTable) {
        assert!(table.pieces().iter().all(|piece| !piece.is_empty()));
        assert_eq!(table.text_len(), table.text().chars().count());
        assert_eq!(table.internal_len(), table.internal_text().chars().count());
        let internal: usize = table.pieces().iter().map(Piece::len).sum();
        assert_eq!(internal, table.internal_len());
        for pair in table.pieces().windows(2) {
            assert!(!pair[0].can_merge(&pair[1]), "pieces left unmerged");
        }
    }

    #[test]
    fn test_round_trip() {
        let table = PieceTable::with_text("Emoji: 😀!");
        assert_eq!(table.text(), "Emoji: 😀!");
        assert_eq!(table.text_len(), 9);
        assert_eq!(table.pieces().len(), 1);
        assert_invariants(&table);
    }

    #[test]
    fn test_insert_splits_piece() {
        let mut table = PieceTable::with_text("Emoji: 😀!");
        table.insert(" smiley", 5).unwrap();
        assert_eq!(table.text(), "Emoji smiley: 😀!");
        let sources: Vec<Source> = table.pieces().iter().map(Piece::source).collect();
        assert_eq!(
            sources,
            vec![Source::Original, Source::Addition, Source::Original]
        );
        assert_invariants(&table);
    }

    #[test]
    fn test_insert_at_start() {
        let mut table = PieceTable::with_text("world");
        table.insert("hello ", 0).unwrap();
        assert_eq!(table.text(), "hello world");
        assert_eq!(table.pieces().len(), 2);
        assert_invariants(&table);
    }

    #[test]
    fn test_insert_out_of_bounds_does_not_mutate() {
        let mut table = PieceTable::with_text("abc");
        let revision = table.revision();
        let err = table.insert("x", 4).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(table.text(), "abc");
        assert_eq!(table.revision(), revision);
    }

    #[test]
    fn test_append_coalesces_typing() {
        let mut table = PieceTable::with_text("ab");
        for ch in ["c", "d", "e"] {
            table.append(ch);
        }
        assert_eq!(table.text(), "abcde");
        assert_eq!(table.pieces().len(), 2);
        assert_eq!(table.pieces()[1].range(), 0..3);
    }

    #[test]
    fn test_insert_at_end_is_append() {
        let mut appended = PieceTable::with_text("ab");
        appended.append("cd");
        let mut inserted = PieceTable::with_text("ab");
        inserted.insert("cd", 2).unwrap();
        assert_eq!(appended.text(), inserted.text());
        assert_eq!(appended.pieces(), inserted.pieces());
    }

    #[test]
    fn test_delete_emoji() {
        let mut table = PieceTable::with_text("Emoji: 😀!");
        table.delete(7, 1).unwrap();
        assert_eq!(table.text(), "Emoji: !");
        assert_eq!(table.text_len(), 8);
        assert_invariants(&table);
    }

    #[test]
    fn test_delete_clamps_length() {
        let mut table = PieceTable::with_text("Emoji: 😀!");
        table.delete(8, 107).unwrap();
        assert_eq!(table.text(), "Emoji: 😀");
        table.delete(0, 107).unwrap();
        assert_eq!(table.text(), "");
        assert!(table.pieces().is_empty());
        assert!(table.delete(1, 1).is_err());
    }

    #[test]
    fn test_delete_inside_sequence_removes_whole_unit() {
        let mut table = PieceTable::with_text("a👨‍👩‍👧b");
        assert_eq!(table.text_len(), 7);
        table.delete(3, 1).unwrap();
        assert_eq!(table.text(), "ab");
        assert_invariants(&table);
    }

    #[test]
    fn test_insert_inside_sequence_goes_before() {
        let mut table = PieceTable::with_text("a👨‍👩‍👧b");
        table.insert("X", 3).unwrap();
        assert_eq!(table.text(), "aX👨‍👩‍👧b");
    }

    #[test]
    fn test_decorate_sub_range() {
        let mut table = PieceTable::with_text("Original Bigger Text");
        table.decorate(1, 2, &red()).unwrap();

        let pieces = table.pieces();
        assert_eq!(pieces.len(), 3);
        assert_eq!(table.piece_text(&pieces[1]), "r");
        assert_eq!(
            pieces[1].decoration().as_text().unwrap().foreground(),
            Some(Rgba::RED)
        );
        assert_eq!(pieces[0].decoration(), &Decoration::default());
        assert_eq!(pieces[2].decoration(), &Decoration::default());
        assert_invariants(&table);
    }

    #[test]
    fn test_decorate_same_style_remerges() {
        let mut table = PieceTable::with_text("plain");
        table
            .decorate(1, 3, &Decoration::Text(TextDecoration::presets()))
            .unwrap();
        assert_eq!(table.pieces().len(), 1);
    }

    #[test]
    fn test_decorate_without_change_is_noop() {
        let mut table = PieceTable::with_text("Original Bigger Text");
        table.decorate(1, 9, &red()).unwrap();
        let before = table.pieces().to_vec();
        let revision = table.revision();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _id = table.add_change_listener(move |event| sink.borrow_mut().push(event.clone()));

        let record = table.apply_decorate(3, 5, &red()).unwrap();
        assert!(record.is_noop());
        assert_eq!(table.pieces(), before.as_slice());
        assert_eq!(table.revision(), revision);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_from_document_with_custom_defaults() {
        let blue = Decoration::Text(
            TextDecoration::builder()
                .presets()
                .foreground(Rgba::BLUE)
                .build(),
        );
        let document = Document::new("abcdef").with_decorations(vec![DecorationModel::new(
            2,
            2,
            TextDecoration::builder().underline(true).build(),
            ParagraphDecoration::default(),
        )]);
        let table = PieceTable::from_document_with_defaults(
            &document,
            blue.clone(),
            ParagraphDecoration::presets(),
        )
        .unwrap();
        assert_eq!(table.default_decoration(), &blue);
        let runs = table.styled_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].decoration, blue);
        assert_eq!(runs[2].decoration, blue);
        let underlined = runs[1].decoration.as_text().unwrap();
        assert!(underlined.is_underline());
        assert_eq!(underlined.foreground(), Some(Rgba::BLUE));
    }

    #[test]
    fn test_paragraph_decoration_covers_paragraph() {
        let mut table = PieceTable::with_text("one\ntwo\nthree");
        let center = Decoration::Paragraph(
            ParagraphDecoration::builder()
                .alignment(TextAlignment::Center)
                .build(),
        );
        table.decorate(5, 5, &center).unwrap();
        let runs = table.styled_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].text, "one\n");
        assert_eq!(runs[1].text, "two\n");
        assert_eq!(runs[1].paragraph.alignment(), Some(TextAlignment::Center));
        assert_eq!(runs[2].paragraph.alignment(), Some(TextAlignment::Left));
    }

    #[test]
    fn test_text_range_rounds_outward() {
        let table = PieceTable::with_text("a👨‍👩‍👧b");
        assert_eq!(table.text_range(0, 1).unwrap(), "a");
        assert_eq!(table.text_range(2, 4).unwrap(), "👨‍👩‍👧");
        assert_eq!(table.text_range(0, 7).unwrap(), "a👨‍👩‍👧b");
        assert_eq!(table.text_range(3, 3).unwrap(), "");
        assert!(table.text_range(4, 2).is_err());
        assert!(table.text_range(0, 8).is_err());
    }

    #[test]
    fn test_position_translation() {
        let mut table = PieceTable::with_text("a👨‍👩‍👧b");
        table.insert("Z", 0).unwrap();
        assert_eq!(table.internal_position(2, Bias::Left), 2);
        assert_eq!(table.internal_position(4, Bias::Left), 2);
        assert_eq!(table.internal_position(4, Bias::Right), 3);
        assert_eq!(table.internal_position(7, Bias::Left), 3);
        assert_eq!(table.external_position(3), 7);
        assert_eq!(table.external_position(4), 8);
    }

    #[test]
    fn test_change_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut table = PieceTable::with_text("Emoji: 😀!");
        let sink = Rc::clone(&events);
        let id = table.add_change_listener(move |event| sink.borrow_mut().push(event.clone()));

        table.insert(" smiley", 5).unwrap();
        table.append("?");
        table.delete(14, 1).unwrap();
        table.decorate(0, 2, &red()).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                ChangeEvent::Insert {
                    text: " smiley".to_string(),
                    position: 5
                },
                ChangeEvent::Insert {
                    text: "?".to_string(),
                    position: 16
                },
                ChangeEvent::Delete {
                    position: 14,
                    length: 1
                },
                ChangeEvent::Decorate { start: 0, end: 2 },
            ]
        );

        assert!(table.remove_change_listener(id));
        table.append("!");
        assert_eq!(events.borrow().len(), 4);
    }

    #[test]
    fn test_revert_and_reapply_restore_pieces() {
        let mut table = PieceTable::with_text("Hello World");
        let before = table.pieces().to_vec();

        let record = table.apply_delete(2, 5).unwrap();
        assert_eq!(table.text(), "Heorld");
        table.revert(&record);
        assert_eq!(table.text(), "Hello World");
        assert_eq!(table.pieces(), before.as_slice());

        table.reapply(&record);
        assert_eq!(table.text(), "Heorld");
    }

    #[test]
    fn test_document_round_trip() {
        let mut table = PieceTable::with_text("Original Bigger Text");
        table.decorate(9, 15, &red()).unwrap();
        let document = table.to_document();
        assert_eq!(document.decorations.len(), 3);

        let reopened = PieceTable::from_document(&document).unwrap();
        assert_eq!(reopened.text(), table.text());
        assert_eq!(reopened.styled_runs(), table.styled_runs());
    }

    #[test]
    fn test_from_document_rejects_bad_models() {
        let overlapping = Document::new("abcdef").with_decorations(vec![
            DecorationModel::new(0, 4, TextDecoration::presets(), ParagraphDecoration::presets()),
            DecorationModel::new(3, 2, TextDecoration::presets(), ParagraphDecoration::presets()),
        ]);
        assert!(matches!(
            PieceTable::from_document(&overlapping),
            Err(Error::InvalidDocument(_))
        ));

        let too_long = Document::new("ab").with_decorations(vec![DecorationModel::new(
            0,
            3,
            TextDecoration::presets(),
            ParagraphDecoration::presets(),
        )]);
        assert!(PieceTable::from_document(&too_long).is_err());

        let block = Document::new("ab").with_decorations(vec![DecorationModel::new(
            0,
            2,
            TableDecoration::new(1, 1),
            ParagraphDecoration::presets(),
        )]);
        assert!(PieceTable::from_document(&block).is_err());
    }

    #[test]
    fn test_from_document_fills_gaps() {
        let document = Document::new("abcdef").with_decorations(vec![DecorationModel::new(
            2,
            2,
            TextDecoration::builder().foreground(Rgba::RED).build(),
            ParagraphDecoration::default(),
        )]);
        let table = PieceTable::from_document(&document).unwrap();
        let runs = table.styled_runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].text, "cd");
        assert_eq!(runs[0].decoration, Decoration::default());
        // Unset paragraph fields are filled from the defaults.
        assert_eq!(runs[1].paragraph, ParagraphDecoration::presets());
    }
}
