//! In-memory document snapshot used to open and save a piece table.

use crate::decoration::{Decoration, ParagraphDecoration, TextDecoration};

/// A decorated external range `start..start + length` of a document's text.
///
/// Only used to seed a piece table and to snapshot one; never a live
/// runtime structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecorationModel {
    pub start: usize,
    pub length: usize,
    pub decoration: Decoration,
    pub paragraph: ParagraphDecoration,
}

impl DecorationModel {
    /// Create a model.
    #[must_use]
    pub fn new(
        start: usize,
        length: usize,
        decoration: impl Into<Decoration>,
        paragraph: ParagraphDecoration,
    ) -> Self {
        Self {
            start,
            length,
            decoration: decoration.into(),
            paragraph,
        }
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Text, its decoration models, and the caret position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub decorations: Vec<DecorationModel>,
    pub caret_position: usize,
}

impl Document {
    /// Create a document with one default-decorated model spanning the text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        let decorations = if length == 0 {
            Vec::new()
        } else {
            vec![DecorationModel::new(
                0,
                length,
                TextDecoration::presets(),
                ParagraphDecoration::presets(),
            )]
        };
        Self {
            text,
            decorations,
            caret_position: 0,
        }
    }

    /// Replace the decoration models.
    #[must_use]
    pub fn with_decorations(mut self, decorations: Vec<DecorationModel>) -> Self {
        self.decorations = decorations;
        self
    }

    /// Set the caret position.
    #[must_use]
    pub const fn with_caret(mut self, caret_position: usize) -> Self {
        self.caret_position = caret_position;
        self
    }

    /// External length of the text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}
