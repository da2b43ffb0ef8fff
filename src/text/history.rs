//! Linear undo/redo command log.
//!
//! A [`Command`] describes an edit intent. Executing it against a
//! [`PieceTable`] records the pieces it removed and inserted, so undo restores
//! the previous piece list exactly, per-run decorations of deleted text
//! included. Redo reinstates the recorded pieces rather than re-running the
//! command, which keeps it exact as well.

use crate::decoration::Decoration;
use crate::error::Result;
use crate::text::piece_table::{EditRecord, PieceTable};
use std::ops::Range;
use tracing::debug;

/// Default maximum number of commands to retain.
pub const DEFAULT_MAX_HISTORY_DEPTH: usize = 1000;

/// An edit intent, in external offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Insert text, optionally with a decoration over the inherited one.
    Insert {
        text: String,
        position: usize,
        decoration: Option<Decoration>,
    },
    /// Append text at the end of the document.
    Append { text: String },
    /// Delete `length` characters at `position`.
    Delete { position: usize, length: usize },
    /// Decorate `start..end`.
    Decorate {
        start: usize,
        end: usize,
        decoration: Decoration,
    },
}

impl Command {
    /// Insert with inherited decorations.
    #[must_use]
    pub fn insert(text: impl Into<String>, position: usize) -> Self {
        Self::Insert {
            text: text.into(),
            position,
            decoration: None,
        }
    }

    /// Append at the end.
    #[must_use]
    pub fn append(text: impl Into<String>) -> Self {
        Self::Append { text: text.into() }
    }

    /// Delete a range.
    #[must_use]
    pub const fn delete(position: usize, length: usize) -> Self {
        Self::Delete { position, length }
    }

    /// Decorate a range.
    #[must_use]
    pub fn decorate(start: usize, end: usize, decoration: impl Into<Decoration>) -> Self {
        Self::Decorate {
            start,
            end,
            decoration: decoration.into(),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Append { .. } => "append",
            Self::Delete { .. } => "delete",
            Self::Decorate { .. } => "decorate",
        }
    }
}

/// Caret position and selection, in external offsets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaretState {
    pub caret: usize,
    pub selection: Option<Range<usize>>,
}

impl CaretState {
    /// Caret without selection.
    #[must_use]
    pub const fn at(caret: usize) -> Self {
        Self {
            caret,
            selection: None,
        }
    }
}

/// A command together with everything needed to invert and replay it.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    command: Command,
    before: CaretState,
    after: CaretState,
    record: Option<EditRecord>,
}

impl HistoryEntry {
    /// Prepare a command for execution.
    #[must_use]
    pub const fn new(command: Command, before: CaretState, after: CaretState) -> Self {
        Self {
            command,
            before,
            after,
            record: None,
        }
    }

    /// The command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Caret state before the edit.
    #[must_use]
    pub const fn before(&self) -> &CaretState {
        &self.before
    }

    /// Caret state after the edit.
    #[must_use]
    pub const fn after(&self) -> &CaretState {
        &self.after
    }

    /// Whether the executed edit changed nothing.
    fn is_noop(&self) -> bool {
        self.record.as_ref().is_none_or(EditRecord::is_noop)
    }
}

fn apply(command: &Command, table: &mut PieceTable) -> Result<EditRecord> {
    match command {
        Command::Insert {
            text,
            position,
            decoration,
        } => table.apply_insert(text, *position, decoration.as_ref()),
        Command::Append { text } => Ok(table.apply_append(text)),
        Command::Delete { position, length } => table.apply_delete(*position, *length),
        Command::Decorate {
            start,
            end,
            decoration,
        } => table.apply_decorate(*start, *end, decoration),
    }
}

/// Apply an entry. The first call runs the command and records its effect;
/// later calls replay the record.
pub fn redo(entry: &mut HistoryEntry, table: &mut PieceTable) -> Result<()> {
    if let Some(record) = entry.record.as_ref() {
        table.reapply(record);
    } else {
        let record = apply(&entry.command, table)?;
        entry.record = Some(record);
    }
    Ok(())
}

/// Invert an applied entry. Entries that were never applied are ignored.
pub fn undo(entry: &HistoryEntry, table: &mut PieceTable) {
    if let Some(record) = entry.record.as_ref() {
        table.revert(record);
    }
}

/// Linear history with a cursor; executing after an undo discards the redo
/// branch. The oldest entries are dropped beyond `max_depth`.
#[derive(Clone, Debug)]
pub struct CommandLog {
    entries: Vec<HistoryEntry>,
    /// Number of applied entries; `entries[cursor..]` is the redo branch.
    cursor: usize,
    max_depth: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY_DEPTH)
    }
}

impl CommandLog {
    /// Create an empty log with the default depth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log with a custom maximum depth.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_depth,
        }
    }

    /// Run a command and record it.
    ///
    /// Returns `Ok(false)` when the command changed nothing; such commands
    /// are not recorded and leave the redo branch intact. On error nothing
    /// is mutated.
    pub fn execute(&mut self, mut entry: HistoryEntry, table: &mut PieceTable) -> Result<bool> {
        redo(&mut entry, table)?;
        if entry.is_noop() {
            return Ok(false);
        }
        debug!(
            command = entry.command.name(),
            discarded = self.entries.len() - self.cursor,
            "execute"
        );
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
        self.enforce_depth();
        Ok(true)
    }

    /// Undo the last applied entry, returning the caret state to restore.
    pub fn undo(&mut self, table: &mut PieceTable) -> Option<CaretState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let entry = &self.entries[self.cursor];
        debug!(command = entry.command.name(), cursor = self.cursor, "undo");
        undo(entry, table);
        Some(entry.before.clone())
    }

    /// Redo the next entry, returning the caret state to restore.
    pub fn redo(&mut self, table: &mut PieceTable) -> Option<CaretState> {
        let entry = self.entries.get_mut(self.cursor)?;
        debug!(command = entry.command.name(), cursor = self.cursor, "redo");
        // Recorded entries replay without re-validation, so this cannot fail.
        redo(entry, table).ok()?;
        self.cursor += 1;
        Some(entry.after.clone())
    }

    /// Check if undo is available.
    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Number of retained entries, including the redo branch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no entry is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Set the maximum depth, dropping the oldest entries if needed.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
        self.enforce_depth();
    }

    fn enforce_depth(&mut self) {
        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::decoration::TextDecoration;

    fn execute(log: &mut CommandLog, table: &mut PieceTable, command: Command) -> bool {
        log.execute(
            HistoryEntry::new(command, CaretState::default(), CaretState::default()),
            table,
        )
        .unwrap()
    }

    #[test]
    fn test_execute_undo_redo() {
        let mut table = PieceTable::with_text("Hello");
        let mut log = CommandLog::new();

        assert!(execute(&mut log, &mut table, Command::append(" World")));
        assert!(execute(&mut log, &mut table, Command::delete(0, 1)));
        assert_eq!(table.text(), "ello World");

        assert!(log.undo(&mut table).is_some());
        assert_eq!(table.text(), "Hello World");
        assert!(log.undo(&mut table).is_some());
        assert_eq!(table.text(), "Hello");
        assert!(log.undo(&mut table).is_none());

        assert!(log.redo(&mut table).is_some());
        assert!(log.redo(&mut table).is_some());
        assert_eq!(table.text(), "ello World");
        assert!(log.redo(&mut table).is_none());
    }

    #[test]
    fn test_execute_truncates_redo_branch() {
        let mut table = PieceTable::with_text("abc");
        let mut log = CommandLog::new();
        execute(&mut log, &mut table, Command::append("d"));
        execute(&mut log, &mut table, Command::append("e"));
        log.undo(&mut table);
        assert!(log.can_redo());

        execute(&mut log, &mut table, Command::insert("X", 0));
        assert!(!log.can_redo());
        assert_eq!(log.len(), 2);
        assert_eq!(table.text(), "Xabcd");
    }

    #[test]
    fn test_noop_not_recorded() {
        let mut table = PieceTable::with_text("abc");
        let mut log = CommandLog::new();
        assert!(!execute(&mut log, &mut table, Command::append("")));
        assert!(!execute(&mut log, &mut table, Command::delete(3, 5)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_failed_command_leaves_log_untouched() {
        let mut table = PieceTable::with_text("abc");
        let mut log = CommandLog::new();
        let entry = HistoryEntry::new(
            Command::insert("x", 9),
            CaretState::default(),
            CaretState::default(),
        );
        assert!(log.execute(entry, &mut table).is_err());
        assert!(log.is_empty());
        assert_eq!(table.text(), "abc");
    }

    #[test]
    fn test_undo_decorate_restores_style() {
        let mut table = PieceTable::with_text("styled");
        let before = table.styled_runs();
        let mut log = CommandLog::new();
        execute(
            &mut log,
            &mut table,
            Command::decorate(1, 4, TextDecoration::builder().background(Rgba::BLUE).build()),
        );
        assert_eq!(table.styled_runs().len(), 3);
        log.undo(&mut table);
        assert_eq!(table.styled_runs(), before);
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut table = PieceTable::new();
        let mut log = CommandLog::with_max_depth(3);
        for ch in ["a", "b", "c", "d", "e"] {
            execute(&mut log, &mut table, Command::append(ch));
        }
        assert_eq!(log.len(), 3);
        while log.undo(&mut table).is_some() {}
        assert_eq!(table.text(), "ab");

        log.set_max_depth(1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.max_depth(), 1);
    }

    #[test]
    fn test_free_functions() {
        let mut table = PieceTable::with_text("abc");
        let mut entry = HistoryEntry::new(Command::delete(1, 1), CaretState::at(2), CaretState::at(1));
        undo(&entry, &mut table);
        assert_eq!(table.text(), "abc");

        redo(&mut entry, &mut table).unwrap();
        assert_eq!(table.text(), "ac");
        undo(&entry, &mut table);
        assert_eq!(table.text(), "abc");
        redo(&mut entry, &mut table).unwrap();
        assert_eq!(table.text(), "ac");
        assert_eq!(entry.before(), &CaretState::at(2));
    }
}
