//! Block-level styling for paragraphs.

use super::FloatBits;
use super::table::TableDecoration;
use std::hash::{Hash, Hasher};

/// Horizontal alignment of a paragraph or table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Graphic drawn in front of a list paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ListGraphic {
    #[default]
    None,
    Bullet,
    Numbered,
}

/// Immutable paragraph style.
///
/// Same optional-field model as [`TextDecoration`](super::TextDecoration):
/// unset fields inherit during [`normalize`](Self::normalize).
#[derive(Clone, Debug, Default)]
pub struct ParagraphDecoration {
    alignment: Option<TextAlignment>,
    spacing: Option<f64>,
    top_inset: Option<f64>,
    right_inset: Option<f64>,
    bottom_inset: Option<f64>,
    left_inset: Option<f64>,
    graphic: Option<ListGraphic>,
    indentation: Option<u32>,
    table: Option<TableDecoration>,
}

impl ParagraphDecoration {
    /// Create a new builder with nothing set.
    #[must_use]
    pub fn builder() -> ParagraphDecorationBuilder {
        ParagraphDecorationBuilder::default()
    }

    /// The canonical defaults.
    #[must_use]
    pub fn presets() -> Self {
        ParagraphDecorationBuilder::default().presets().build()
    }

    /// Merge with a previous decoration: set fields win, unset inherit.
    #[must_use]
    pub fn normalize(&self, previous: &Self) -> Self {
        Self {
            alignment: self.alignment.or(previous.alignment),
            spacing: self.spacing.or(previous.spacing),
            top_inset: self.top_inset.or(previous.top_inset),
            right_inset: self.right_inset.or(previous.right_inset),
            bottom_inset: self.bottom_inset.or(previous.bottom_inset),
            left_inset: self.left_inset.or(previous.left_inset),
            graphic: self.graphic.or(previous.graphic),
            indentation: self.indentation.or(previous.indentation),
            table: self.table.clone().or_else(|| previous.table.clone()),
        }
    }

    /// Paragraph alignment.
    #[must_use]
    pub const fn alignment(&self) -> Option<TextAlignment> {
        self.alignment
    }

    /// Line spacing.
    #[must_use]
    pub const fn spacing(&self) -> Option<f64> {
        self.spacing
    }

    /// Insets as `[top, right, bottom, left]`.
    #[must_use]
    pub const fn insets(&self) -> [Option<f64>; 4] {
        [
            self.top_inset,
            self.right_inset,
            self.bottom_inset,
            self.left_inset,
        ]
    }

    /// List graphic.
    #[must_use]
    pub const fn graphic(&self) -> Option<ListGraphic> {
        self.graphic
    }

    /// Indentation level.
    #[must_use]
    pub const fn indentation(&self) -> Option<u32> {
        self.indentation
    }

    /// Table layout, when this paragraph is a table.
    #[must_use]
    pub const fn table(&self) -> Option<&TableDecoration> {
        self.table.as_ref()
    }

    /// Copy with the table layout replaced.
    #[must_use]
    pub fn with_table(&self, table: Option<TableDecoration>) -> Self {
        Self {
            table,
            ..self.clone()
        }
    }

    fn float_fields(&self) -> [Option<u64>; 5] {
        [
            self.spacing.float_bits(),
            self.top_inset.float_bits(),
            self.right_inset.float_bits(),
            self.bottom_inset.float_bits(),
            self.left_inset.float_bits(),
        ]
    }
}

impl PartialEq for ParagraphDecoration {
    fn eq(&self, other: &Self) -> bool {
        self.alignment == other.alignment
            && self.float_fields() == other.float_fields()
            && self.graphic == other.graphic
            && self.indentation == other.indentation
            && self.table == other.table
    }
}

impl Eq for ParagraphDecoration {}

impl Hash for ParagraphDecoration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alignment.hash(state);
        self.float_fields().hash(state);
        self.graphic.hash(state);
        self.indentation.hash(state);
        self.table.hash(state);
    }
}

/// Builder for [`ParagraphDecoration`].
#[derive(Clone, Debug, Default)]
pub struct ParagraphDecorationBuilder {
    decoration: ParagraphDecoration,
}

impl ParagraphDecorationBuilder {
    /// Set every field to its canonical default (no table).
    #[must_use]
    pub fn presets(mut self) -> Self {
        self.decoration = ParagraphDecoration {
            alignment: Some(TextAlignment::Left),
            spacing: Some(0.0),
            top_inset: Some(0.0),
            right_inset: Some(0.0),
            bottom_inset: Some(0.0),
            left_inset: Some(0.0),
            graphic: Some(ListGraphic::None),
            indentation: Some(0),
            table: None,
        };
        self
    }

    /// Start from a copy of another decoration.
    #[must_use]
    pub fn from_decoration(mut self, other: &ParagraphDecoration) -> Self {
        self.decoration = other.clone();
        self
    }

    /// Set alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: TextAlignment) -> Self {
        self.decoration.alignment = Some(alignment);
        self
    }

    /// Set line spacing.
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.decoration.spacing = Some(spacing);
        self
    }

    /// Set the four insets.
    #[must_use]
    pub fn insets(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.decoration.top_inset = Some(top);
        self.decoration.right_inset = Some(right);
        self.decoration.bottom_inset = Some(bottom);
        self.decoration.left_inset = Some(left);
        self
    }

    /// Set list graphic.
    #[must_use]
    pub fn graphic(mut self, graphic: ListGraphic) -> Self {
        self.decoration.graphic = Some(graphic);
        self
    }

    /// Set indentation level.
    #[must_use]
    pub fn indentation(mut self, level: u32) -> Self {
        self.decoration.indentation = Some(level);
        self
    }

    /// Attach a table layout.
    #[must_use]
    pub fn table(mut self, table: TableDecoration) -> Self {
        self.decoration.table = Some(table);
        self
    }

    /// Build the final decoration.
    #[must_use]
    pub fn build(self) -> ParagraphDecoration {
        self.decoration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let previous = ParagraphDecoration::builder()
            .presets()
            .graphic(ListGraphic::Bullet)
            .build();
        let overlay = ParagraphDecoration::builder()
            .alignment(TextAlignment::Center)
            .build();
        let merged = overlay.normalize(&previous);
        assert_eq!(merged.alignment(), Some(TextAlignment::Center));
        assert_eq!(merged.graphic(), Some(ListGraphic::Bullet));
        assert_eq!(merged.insets(), [Some(0.0); 4]);
    }

    #[test]
    fn test_equality_covers_table() {
        let plain = ParagraphDecoration::presets();
        let table = plain.with_table(Some(TableDecoration::new(2, 3)));
        assert_ne!(plain, table);
        assert_eq!(table.table().map(TableDecoration::columns), Some(3));
        assert_eq!(plain, ParagraphDecoration::presets());
    }
}
