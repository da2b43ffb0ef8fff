//! Immutable style records attached to document ranges.
//!
//! - [`TextDecoration`]: colours, font, effects, hyperlink target
//! - [`ParagraphDecoration`]: alignment, spacing, insets, list graphic
//! - [`TableDecoration`]: row/column grid over a paragraph
//! - [`ImageDecoration`]: an image shown in place of an embedded object
//! - [`HyperlinkDecoration`]: a link target plus optional text styling
//!
//! All decorations are built with builders, compare structurally, and merge
//! with `normalize(previous)`: explicitly set fields win, unset fields
//! inherit.

mod paragraph;
mod table;
mod text;

pub use paragraph::{ListGraphic, ParagraphDecoration, ParagraphDecorationBuilder, TextAlignment};
pub use table::{TableDecoration, TableDecorationBuilder};
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontPosture, FontWeight, TextDecoration,
    TextDecorationBuilder, TextEffects,
};

/// Bit-pattern view of optional floats for structural `Eq`/`Hash`.
pub(crate) trait FloatBits {
    fn float_bits(&self) -> Option<u64>;
}

impl FloatBits for Option<f64> {
    fn float_bits(&self) -> Option<u64> {
        self.map(f64::to_bits)
    }
}

/// An image shown in place of an embedded object unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageDecoration {
    url: String,
    width: Option<u32>,
    height: Option<u32>,
}

impl ImageDecoration {
    /// Create an image decoration with intrinsic size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
        }
    }

    /// Fix the rendered size.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Image location.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Rendered width, if fixed.
    #[must_use]
    pub const fn width(&self) -> Option<u32> {
        self.width
    }

    /// Rendered height, if fixed.
    #[must_use]
    pub const fn height(&self) -> Option<u32> {
        self.height
    }
}

/// A hyperlink applied to a range; folds into a [`TextDecoration`] with its
/// `url` set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HyperlinkDecoration {
    url: String,
    style: TextDecoration,
}

impl HyperlinkDecoration {
    /// Create a link with default link styling (underlined).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            style: TextDecoration::builder().underline(true).build(),
        }
    }

    /// Replace the link styling.
    #[must_use]
    pub fn with_style(mut self, style: TextDecoration) -> Self {
        self.style = style;
        self
    }

    /// Link target.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text decoration equivalent of this link.
    #[must_use]
    pub fn to_text_decoration(&self) -> TextDecoration {
        TextDecoration::builder()
            .from_decoration(&self.style)
            .url(self.url.clone())
            .build()
    }
}

/// Any decoration that can be applied to a range.
///
/// Pieces store a character-level decoration (only [`Decoration::Text`] or
/// [`Decoration::Image`]) plus a separate [`ParagraphDecoration`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decoration {
    Text(TextDecoration),
    Paragraph(ParagraphDecoration),
    Table(TableDecoration),
    Image(ImageDecoration),
    Hyperlink(HyperlinkDecoration),
}

impl Default for Decoration {
    fn default() -> Self {
        Self::Text(TextDecoration::presets())
    }
}

impl From<TextDecoration> for Decoration {
    fn from(decoration: TextDecoration) -> Self {
        Self::Text(decoration)
    }
}

impl From<ParagraphDecoration> for Decoration {
    fn from(decoration: ParagraphDecoration) -> Self {
        Self::Paragraph(decoration)
    }
}

impl From<TableDecoration> for Decoration {
    fn from(decoration: TableDecoration) -> Self {
        Self::Table(decoration)
    }
}

impl From<ImageDecoration> for Decoration {
    fn from(decoration: ImageDecoration) -> Self {
        Self::Image(decoration)
    }
}

impl From<HyperlinkDecoration> for Decoration {
    fn from(decoration: HyperlinkDecoration) -> Self {
        Self::Hyperlink(decoration)
    }
}

impl Decoration {
    /// Whether this decoration targets whole paragraphs.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self, Self::Paragraph(_) | Self::Table(_))
    }

    /// The text decoration, if this is one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextDecoration> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The image decoration, if this is one.
    #[must_use]
    pub const fn as_image(&self) -> Option<&ImageDecoration> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Merge a character-level decoration over a piece's previous one.
    ///
    /// Text and hyperlink decorations normalize over a previous text
    /// decoration; images replace whatever was there, and restyling an image
    /// with text fields leaves it unchanged. Block decorations do not touch
    /// the character-level decoration.
    #[must_use]
    pub fn normalize(&self, previous: &Self) -> Self {
        match (self, previous) {
            (Self::Text(text), Self::Text(old)) => Self::Text(text.normalize(old)),
            (Self::Hyperlink(link), Self::Text(old)) => {
                Self::Text(link.to_text_decoration().normalize(old))
            }
            (Self::Image(image), _) => Self::Image(image.clone()),
            (Self::Text(_) | Self::Hyperlink(_), Self::Image(_))
            | (Self::Paragraph(_) | Self::Table(_), _) => previous.clone(),
            (Self::Text(text), _) => Self::Text(text.clone()),
            (Self::Hyperlink(link), _) => Self::Text(link.to_text_decoration()),
        }
    }

    /// Merge a block decoration over a previous paragraph decoration.
    ///
    /// Returns `previous` unchanged for character-level decorations.
    #[must_use]
    pub fn normalize_paragraph(&self, previous: &ParagraphDecoration) -> ParagraphDecoration {
        match self {
            Self::Paragraph(paragraph) => paragraph.normalize(previous),
            Self::Table(table) => previous.with_table(Some(table.clone())),
            _ => previous.clone(),
        }
    }
}
