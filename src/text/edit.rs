//! Editing session over a piece table with caret, selection, and undo/redo.
//!
//! # Examples
//!
//! ```
//! use pieceweave::RichEditBuffer;
//!
//! let mut buf = RichEditBuffer::with_text("Hello World");
//! buf.delete(5, 6).unwrap();
//! assert_eq!(buf.text(), "Hello");
//! assert_eq!(buf.caret(), 5);
//!
//! // Undo restores text and caret
//! buf.undo();
//! assert_eq!(buf.text(), "Hello World");
//! ```

use crate::decoration::{Decoration, ParagraphDecoration};
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ListenerId};
use crate::text::document::Document;
use crate::text::history::{CaretState, Command, CommandLog, DEFAULT_MAX_HISTORY_DEPTH, HistoryEntry};
use crate::text::piece_table::PieceTable;
use crate::text::unit_buffer::Bias;
use std::ops::Range;

/// Options for a [`RichEditBuffer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOptions {
    /// Maximum number of commands kept for undo.
    pub max_history_depth: usize,
    /// Character decoration where none can be inherited.
    pub default_decoration: Decoration,
    /// Paragraph decoration where none can be inherited.
    pub default_paragraph: ParagraphDecoration,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            max_history_depth: DEFAULT_MAX_HISTORY_DEPTH,
            default_decoration: Decoration::default(),
            default_paragraph: ParagraphDecoration::presets(),
        }
    }
}

impl EditOptions {
    /// Set the maximum history depth.
    #[must_use]
    pub const fn with_max_history_depth(mut self, depth: usize) -> Self {
        self.max_history_depth = depth;
        self
    }

    /// Set the default character decoration.
    #[must_use]
    pub fn with_default_decoration(mut self, decoration: impl Into<Decoration>) -> Self {
        self.default_decoration = decoration.into();
        self
    }

    /// Set the default paragraph decoration.
    #[must_use]
    pub fn with_default_paragraph(mut self, paragraph: ParagraphDecoration) -> Self {
        self.default_paragraph = paragraph;
        self
    }
}

/// A [`PieceTable`] with caret, selection, and a bounded command history.
///
/// Every mutation goes through a [`Command`] so it can be undone. The
/// history depth is bounded (default 1000 commands); the oldest commands are
/// dropped first.
#[derive(Debug, Default)]
pub struct RichEditBuffer {
    table: PieceTable,
    caret: usize,
    selection: Option<Range<usize>>,
    history: CommandLog,
}

impl RichEditBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with initial text.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            table: PieceTable::with_text(text),
            ..Self::default()
        }
    }

    /// Open a document with default options.
    pub fn from_document(document: &Document) -> Result<Self> {
        Self::with_options(document, EditOptions::default())
    }

    /// Open a document with custom options.
    pub fn with_options(document: &Document, options: EditOptions) -> Result<Self> {
        let table = PieceTable::from_document_with_defaults(
            document,
            options.default_decoration,
            options.default_paragraph,
        )?;
        let caret = document.caret_position.min(table.text_len());
        Ok(Self {
            table,
            caret,
            selection: None,
            history: CommandLog::with_max_depth(options.max_history_depth),
        })
    }

    /// Snapshot text, decorations, and caret.
    #[must_use]
    pub fn to_document(&self) -> Document {
        self.table.to_document().with_caret(self.caret)
    }

    /// The underlying piece table.
    #[must_use]
    pub const fn table(&self) -> &PieceTable {
        &self.table
    }

    /// Full visible text.
    #[must_use]
    pub fn text(&self) -> String {
        self.table.text()
    }

    /// External text length.
    #[must_use]
    pub const fn text_len(&self) -> usize {
        self.table.text_len()
    }

    /// Caret position.
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, clamped to the text and snapped before an atomic unit.
    pub fn set_caret(&mut self, position: usize) {
        self.caret = self.snap(position);
        self.selection = None;
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> Option<&Range<usize>> {
        self.selection.as_ref()
    }

    /// Select `range`, placing the caret at its end.
    pub fn set_selection(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.text_len() {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.text_len(),
            });
        }
        self.caret = range.end;
        self.selection = (!range.is_empty()).then_some(range);
        Ok(())
    }

    /// Drop the selection, keeping the caret.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Selected text, if any.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        let range = self.selection.as_ref()?;
        self.table.text_range(range.start, range.end).ok()
    }

    /// Insert text at a position; the caret ends after it.
    pub fn insert(&mut self, text: &str, position: usize) -> Result<()> {
        self.execute(Command::insert(text, position))
    }

    /// Append text at the end; the caret ends after it.
    pub fn append(&mut self, text: &str) -> Result<()> {
        self.execute(Command::append(text))
    }

    /// Delete a range; the caret ends at its start.
    pub fn delete(&mut self, position: usize, length: usize) -> Result<()> {
        self.execute(Command::delete(position, length))
    }

    /// Decorate a range; caret and selection are unchanged.
    pub fn decorate(&mut self, start: usize, end: usize, decoration: impl Into<Decoration>) -> Result<()> {
        self.execute(Command::decorate(start, end, decoration))
    }

    /// Run a command and record it for undo.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        let before = self.caret_state();
        let after = self.caret_after(&command);
        let entry = HistoryEntry::new(command, before, after.clone());
        if self.history.execute(entry, &mut self.table)? {
            self.restore(after);
        }
        Ok(())
    }

    /// Undo the last command. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.table) {
            Some(state) => {
                self.restore(state);
                true
            }
            None => false,
        }
    }

    /// Redo the next command. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.table) {
            Some(state) => {
                self.restore(state);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all undo/redo history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Set the maximum undo history depth, pruning the oldest commands.
    pub fn set_max_history_depth(&mut self, depth: usize) {
        self.history.set_max_depth(depth);
    }

    /// Get the maximum undo history depth.
    #[must_use]
    pub const fn max_history_depth(&self) -> usize {
        self.history.max_depth()
    }

    /// Register a change listener on the underlying table.
    pub fn add_change_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.table.add_change_listener(listener)
    }

    /// Remove a change listener.
    pub fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.table.remove_change_listener(id)
    }

    fn caret_state(&self) -> CaretState {
        CaretState {
            caret: self.caret,
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, state: CaretState) {
        self.caret = state.caret.min(self.table.text_len());
        self.selection = state.selection;
    }

    fn snap(&self, position: usize) -> usize {
        let offset = self.table.internal_position(position, Bias::Left);
        self.table.external_position(offset)
    }

    /// Caret state once `command` has run. Invalid commands fail before this
    /// is used, so out-of-range positions only need to not panic.
    fn caret_after(&self, command: &Command) -> CaretState {
        match command {
            Command::Insert { text, position, .. } => {
                let start = if *position >= self.text_len() {
                    self.text_len()
                } else {
                    self.snap(*position)
                };
                CaretState::at(start + text.chars().count())
            }
            Command::Append { text } => CaretState::at(self.text_len() + text.chars().count()),
            Command::Delete { position, .. } => CaretState::at(self.snap(*position)),
            Command::Decorate { .. } => self.caret_state(),
        }
    }
}
