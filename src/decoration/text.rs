//! Character-level styling.

use super::FloatBits;
use crate::color::Rgba;
use bitflags::bitflags;
use std::hash::{Hash, Hasher};

bitflags! {
    /// Line and position effects applied to text.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextEffects: u8 {
        /// Underlined text.
        const UNDERLINE     = 0x01;
        /// Strikethrough text.
        const STRIKETHROUGH = 0x02;
        /// Raised, smaller text.
        const SUPERSCRIPT   = 0x04;
        /// Lowered, smaller text.
        const SUBSCRIPT     = 0x08;
    }
}

/// Font weight, CSS-style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontWeight {
    Thin,
    Light,
    #[default]
    Normal,
    Medium,
    Bold,
    Black,
}

/// Font posture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontPosture {
    #[default]
    Regular,
    Italic,
}

/// Immutable character style.
///
/// Every field is optional: `None` means "not set here", so that
/// [`normalize`](Self::normalize) can fall back to a previous decoration.
/// Effects carry their own mask of explicitly set bits for the same reason.
///
/// # Examples
///
/// ```
/// use pieceweave::{Rgba, TextDecoration, FontWeight};
///
/// let base = TextDecoration::presets();
/// let red = TextDecoration::builder().foreground(Rgba::RED).build();
///
/// let merged = red.normalize(&base);
/// assert_eq!(merged.foreground(), Some(Rgba::RED));
/// assert_eq!(merged.font_weight(), Some(FontWeight::Normal));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TextDecoration {
    foreground: Option<Rgba>,
    background: Option<Rgba>,
    font_family: Option<String>,
    font_size: Option<f64>,
    font_weight: Option<FontWeight>,
    font_posture: Option<FontPosture>,
    effects: TextEffects,
    effects_set: TextEffects,
    url: Option<String>,
}

/// Default font family used by [`TextDecoration::presets`].
pub const DEFAULT_FONT_FAMILY: &str = "System";

/// Default font size in points used by [`TextDecoration::presets`].
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

impl TextDecoration {
    /// Create a new builder with nothing set.
    #[must_use]
    pub fn builder() -> TextDecorationBuilder {
        TextDecorationBuilder::default()
    }

    /// The canonical defaults with every field set.
    #[must_use]
    pub fn presets() -> Self {
        TextDecorationBuilder::default().presets().build()
    }

    /// Merge with a previous decoration: fields set here win, unset fields
    /// are inherited from `previous`.
    #[must_use]
    pub fn normalize(&self, previous: &Self) -> Self {
        Self {
            foreground: self.foreground.or(previous.foreground),
            background: self.background.or(previous.background),
            font_family: self
                .font_family
                .clone()
                .or_else(|| previous.font_family.clone()),
            font_size: self.font_size.or(previous.font_size),
            font_weight: self.font_weight.or(previous.font_weight),
            font_posture: self.font_posture.or(previous.font_posture),
            effects: (self.effects & self.effects_set)
                | (previous.effects & !self.effects_set),
            effects_set: self.effects_set | previous.effects_set,
            url: self.url.clone().or_else(|| previous.url.clone()),
        }
    }

    /// Foreground colour.
    #[must_use]
    pub const fn foreground(&self) -> Option<Rgba> {
        self.foreground
    }

    /// Background colour.
    #[must_use]
    pub const fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// Font family name.
    #[must_use]
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Font size in points.
    #[must_use]
    pub const fn font_size(&self) -> Option<f64> {
        self.font_size
    }

    /// Font weight.
    #[must_use]
    pub const fn font_weight(&self) -> Option<FontWeight> {
        self.font_weight
    }

    /// Font posture.
    #[must_use]
    pub const fn font_posture(&self) -> Option<FontPosture> {
        self.font_posture
    }

    /// Effects that are switched on.
    #[must_use]
    pub const fn effects(&self) -> TextEffects {
        self.effects
    }

    /// Whether an effect was explicitly set (on or off).
    #[must_use]
    pub const fn is_effect_set(&self, effect: TextEffects) -> bool {
        self.effects_set.contains(effect)
    }

    /// Underline on?
    #[must_use]
    pub const fn is_underline(&self) -> bool {
        self.effects.contains(TextEffects::UNDERLINE)
    }

    /// Strikethrough on?
    #[must_use]
    pub const fn is_strikethrough(&self) -> bool {
        self.effects.contains(TextEffects::STRIKETHROUGH)
    }

    /// Hyperlink target.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Check if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none()
            && self.background.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
            && self.font_weight.is_none()
            && self.font_posture.is_none()
            && self.effects_set.is_empty()
            && self.url.is_none()
    }
}

impl PartialEq for TextDecoration {
    fn eq(&self, other: &Self) -> bool {
        self.foreground == other.foreground
            && self.background == other.background
            && self.font_family == other.font_family
            && self.font_size.float_bits() == other.font_size.float_bits()
            && self.font_weight == other.font_weight
            && self.font_posture == other.font_posture
            && self.effects == other.effects
            && self.effects_set == other.effects_set
            && self.url == other.url
    }
}

impl Eq for TextDecoration {}

impl Hash for TextDecoration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.foreground.hash(state);
        self.background.hash(state);
        self.font_family.hash(state);
        self.font_size.float_bits().hash(state);
        self.font_weight.hash(state);
        self.font_posture.hash(state);
        self.effects.hash(state);
        self.effects_set.hash(state);
        self.url.hash(state);
    }
}

/// Builder for [`TextDecoration`].
#[derive(Clone, Debug, Default)]
pub struct TextDecorationBuilder {
    decoration: TextDecoration,
}

impl TextDecorationBuilder {
    /// Set every field to its canonical default.
    #[must_use]
    pub fn presets(mut self) -> Self {
        self.decoration = TextDecoration {
            foreground: Some(Rgba::BLACK),
            background: Some(Rgba::TRANSPARENT),
            font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
            font_size: Some(DEFAULT_FONT_SIZE),
            font_weight: Some(FontWeight::Normal),
            font_posture: Some(FontPosture::Regular),
            effects: TextEffects::empty(),
            effects_set: TextEffects::all(),
            url: None,
        };
        self
    }

    /// Start from a copy of another decoration.
    #[must_use]
    pub fn from_decoration(mut self, other: &TextDecoration) -> Self {
        self.decoration = other.clone();
        self
    }

    /// Set foreground colour.
    #[must_use]
    pub fn foreground(mut self, color: Rgba) -> Self {
        self.decoration.foreground = Some(color);
        self
    }

    /// Set background colour.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.decoration.background = Some(color);
        self
    }

    /// Set font family.
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.decoration.font_family = Some(family.into());
        self
    }

    /// Set font size in points.
    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.decoration.font_size = Some(size);
        self
    }

    /// Set font weight.
    #[must_use]
    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.decoration.font_weight = Some(weight);
        self
    }

    /// Set font posture.
    #[must_use]
    pub fn font_posture(mut self, posture: FontPosture) -> Self {
        self.decoration.font_posture = Some(posture);
        self
    }

    /// Switch an effect on or off explicitly.
    #[must_use]
    pub fn effect(mut self, effect: TextEffects, on: bool) -> Self {
        self.decoration.effects.set(effect, on);
        self.decoration.effects_set |= effect;
        self
    }

    /// Set underline.
    #[must_use]
    pub fn underline(self, on: bool) -> Self {
        self.effect(TextEffects::UNDERLINE, on)
    }

    /// Set strikethrough.
    #[must_use]
    pub fn strikethrough(self, on: bool) -> Self {
        self.effect(TextEffects::STRIKETHROUGH, on)
    }

    /// Set hyperlink target.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.decoration.url = Some(url.into());
        self
    }

    /// Build the final decoration.
    #[must_use]
    pub fn build(self) -> TextDecoration {
        self.decoration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_presets_fully_set() {
        let presets = TextDecoration::presets();
        assert_eq!(presets.foreground(), Some(Rgba::BLACK));
        assert_eq!(presets.font_family(), Some(DEFAULT_FONT_FAMILY));
        assert_eq!(presets.font_size(), Some(DEFAULT_FONT_SIZE));
        assert!(presets.is_effect_set(TextEffects::all()));
        assert!(!presets.is_underline());
        assert!(!presets.is_empty());
        assert!(TextDecoration::default().is_empty());
    }

    #[test]
    fn test_normalize_overrides_and_inherits() {
        let previous = TextDecoration::builder()
            .presets()
            .font_weight(FontWeight::Bold)
            .underline(true)
            .build();
        let overlay = TextDecoration::builder()
            .foreground(Rgba::RED)
            .strikethrough(true)
            .build();

        let merged = overlay.normalize(&previous);
        assert_eq!(merged.foreground(), Some(Rgba::RED));
        assert_eq!(merged.font_weight(), Some(FontWeight::Bold));
        assert!(merged.is_underline());
        assert!(merged.is_strikethrough());
    }

    #[test]
    fn test_normalize_can_switch_effect_off() {
        let previous = TextDecoration::builder().underline(true).build();
        let overlay = TextDecoration::builder().underline(false).build();
        assert!(!overlay.normalize(&previous).is_underline());
    }

    #[test]
    fn test_from_decoration_copies_then_overrides() {
        let base = TextDecoration::builder()
            .font_family("Serif")
            .font_size(12.0)
            .build();
        let copy = TextDecoration::builder()
            .from_decoration(&base)
            .font_size(18.0)
            .build();
        assert_eq!(copy.font_family(), Some("Serif"));
        assert_eq!(copy.font_size(), Some(18.0));
        assert_eq!(base.font_size(), Some(12.0));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = TextDecoration::builder().font_size(12.5).url("https://a").build();
        let b = TextDecoration::builder().font_size(12.5).url("https://a").build();
        let c = TextDecoration::builder().font_size(12.0).url("https://a").build();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<TextDecoration> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
