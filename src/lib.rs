//! `pieceweave` - Piece-table rich text buffer
//!
//! The document model behind a rich-text editor control: text mixed with
//! atomic emoji and embedded-object units, per-range character and paragraph
//! decorations, change notification, linear undo/redo, and row/column
//! addressing for table paragraphs.
//!
//! ```
//! use pieceweave::{PieceTable, Rgba, TextDecoration};
//!
//! let mut table = PieceTable::with_text("Original Bigger Text");
//! let red = TextDecoration::builder().foreground(Rgba::RED).build();
//! table.decorate(1, 2, &red.into()).unwrap();
//!
//! let runs = table.styled_runs();
//! assert_eq!(runs[1].text, "r");
//! ```

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // Allow TextDecoration in decoration::text
#![allow(clippy::missing_errors_doc)] // Errors are documented on the Error enum
#![allow(clippy::missing_panics_doc)] // Panics only on internal invariant violations
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::must_use_candidate)] // Not every accessor needs #[must_use]
#![allow(clippy::return_self_not_must_use)] // Builders are obviously consumed
#![allow(clippy::float_cmp)] // Decoration floats are compared by value intentionally
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod color;
pub mod decoration;
pub mod error;
pub mod event;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use color::Rgba;
pub use decoration::{
    Decoration, FontPosture, FontWeight, HyperlinkDecoration, ImageDecoration, ListGraphic,
    ParagraphDecoration, TableDecoration, TextAlignment, TextDecoration, TextEffects,
};
pub use error::{Error, Result};
pub use event::{ChangeEvent, ListenerId};

// Re-export commonly used types
pub use text::{
    Bias, Command, CommandLog, DecorationModel, Direction, Document, EditOptions, Fragment,
    FragmentContent, Piece, PieceTable, RichEditBuffer, Source, StyledRun, TABLE_SEPARATOR, Table,
    Unit, UnitBuffer,
};
