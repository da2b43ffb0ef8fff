//! Rich-text storage and editing.
//!
//! The document is a [`PieceTable`] over two [`UnitBuffer`]s of [`Unit`]s:
//! plain text runs, emoji, and embedded objects. Emoji and objects occupy a
//! single internal slot however many characters they show, so the table
//! translates between *external* (visible `char`) positions and *internal*
//! (storage) offsets.
//!
//! Key types:
//!
//! - [`PieceTable`]: insert, delete, append, decorate, fragment walking, and
//!   change notification
//! - [`RichEditBuffer`]: a piece table with caret, selection, and undo/redo
//! - [`CommandLog`]: linear, bounded command history
//! - [`Table`]: row/column addressing within a table-decorated paragraph
//! - [`Document`]: plain snapshot used to open and save a table
//!
//! # Examples
//!
//! ## Piece table
//!
//! ```
//! use pieceweave::PieceTable;
//!
//! let mut table = PieceTable::with_text("Hello");
//! table.append(", world");
//! assert_eq!(table.text(), "Hello, world");
//! ```
//!
//! ## Editing with undo
//!
//! ```
//! use pieceweave::{Rgba, RichEditBuffer, TextDecoration};
//!
//! let mut edit = RichEditBuffer::with_text("Hello");
//! edit.decorate(0, 5, TextDecoration::builder().foreground(Rgba::RED).build())
//!     .unwrap();
//! edit.insert("!", 5).unwrap();
//! assert_eq!(edit.text(), "Hello!");
//!
//! edit.undo();
//! edit.undo();
//! assert_eq!(edit.table().styled_runs().len(), 1);
//! ```

mod document;
mod edit;
mod fragment;
mod history;
mod piece;
mod piece_table;
mod table;
mod unit;
mod unit_buffer;

pub use document::{DecorationModel, Document};
pub use edit::{EditOptions, RichEditBuffer};
pub use fragment::{Fragment, FragmentContent, Fragments};
pub use history::{
    CaretState, Command, CommandLog, DEFAULT_MAX_HISTORY_DEPTH, HistoryEntry, redo, undo,
};
pub use piece::{Piece, Source};
pub use piece_table::{PieceTable, StyledRun};
pub use table::{Cell, Direction, TABLE_SEPARATOR, Table};
pub use unit::{EmojiUnit, ObjectUnit, Unit, segment};
pub use unit_buffer::{Bias, UnitBuffer, UnitSlice, UnitSlices};
