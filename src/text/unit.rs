//! Atomic building blocks of a document.
//!
//! A [`Unit`] is either a run of plain text, a single emoji, or an embedded
//! object. Each unit has two lengths:
//!
//! - **internal**: storage slots (one per `char` for text, exactly one for
//!   emoji and objects)
//! - **external**: `char`s of the user-visible text
//!
//! Emoji and objects are atomic: they are never split.

use crate::unicode::{EMOJI_PLACEHOLDER, OBJECT_REPLACEMENT, grapheme_indices, is_emoji};
use std::borrow::Cow;

/// A single emoji grapheme cluster (possibly a multi-codepoint sequence).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmojiUnit {
    grapheme: String,
}

impl EmojiUnit {
    /// Create an emoji unit from its grapheme cluster.
    #[must_use]
    pub fn new(grapheme: impl Into<String>) -> Self {
        Self {
            grapheme: grapheme.into(),
        }
    }

    /// The full emoji sequence.
    #[must_use]
    pub fn grapheme(&self) -> &str {
        &self.grapheme
    }
}

/// An embedded non-text object ("box"), identified by a short tag.
///
/// Its visible text is the object replacement character followed by the
/// bracketed identifier, e.g. `"\u{FFFC}[img-1]"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUnit {
    id: String,
}

impl ObjectUnit {
    /// Create an object unit. The identifier must not contain `]` or newlines.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The object's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The visible placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{OBJECT_REPLACEMENT}[{}]", self.id)
    }
}

/// The atomic addressable element of a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// A non-empty run of plain text.
    Text(String),
    /// A single emoji.
    Emoji(EmojiUnit),
    /// An embedded object.
    Object(ObjectUnit),
}

impl Unit {
    /// Create a text unit.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an emoji unit.
    #[must_use]
    pub fn emoji(grapheme: impl Into<String>) -> Self {
        Self::Emoji(EmojiUnit::new(grapheme))
    }

    /// Create an object unit.
    #[must_use]
    pub fn object(id: impl Into<String>) -> Self {
        Self::Object(ObjectUnit::new(id))
    }

    /// Storage slots occupied by this unit.
    #[must_use]
    pub fn internal_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Emoji(_) | Self::Object(_) => 1,
        }
    }

    /// Visible `char`s this unit expands to.
    #[must_use]
    pub fn external_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Emoji(emoji) => emoji.grapheme.chars().count(),
            // Replacement char plus the two brackets.
            Self::Object(object) => object.id.chars().count() + 3,
        }
    }

    /// The visible text.
    #[must_use]
    pub fn external_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Emoji(emoji) => Cow::Borrowed(&emoji.grapheme),
            Self::Object(object) => Cow::Owned(object.placeholder()),
        }
    }

    /// The storage text (placeholders for atomic units).
    #[must_use]
    pub fn internal_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Emoji(_) => Cow::Owned(EMOJI_PLACEHOLDER.to_string()),
            Self::Object(_) => Cow::Owned(OBJECT_REPLACEMENT.to_string()),
        }
    }

    /// Whether this unit is indivisible.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Split a text unit at an internal offset.
    ///
    /// # Panics
    ///
    /// Panics when asked to split an atomic unit anywhere but its edges, or
    /// when `offset` lies inside neither part. Public editing paths only
    /// reach here with valid internal offsets.
    #[must_use]
    pub fn split_at(&self, offset: usize) -> (Option<Self>, Option<Self>) {
        let len = self.internal_len();
        assert!(offset <= len, "split offset {offset} beyond unit length {len}");
        match self {
            Self::Text(text) => {
                let byte = char_to_byte(text, offset);
                let (before, after) = text.split_at(byte);
                (
                    (!before.is_empty()).then(|| Self::Text(before.to_string())),
                    (!after.is_empty()).then(|| Self::Text(after.to_string())),
                )
            }
            _ if offset == 0 => (None, Some(self.clone())),
            _ => (Some(self.clone()), None),
        }
    }
}

/// Byte index of the `char_idx`-th char (or `text.len()` past the end).
pub(crate) fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Slice a string by a `char` range.
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let from = char_to_byte(text, start);
    let to = from + char_to_byte(&text[from..], end - start);
    &text[from..to]
}

/// Cut text into units.
///
/// Emoji grapheme clusters become [`Unit::Emoji`], the sequence
/// `U+FFFC '[' id ']'` becomes [`Unit::Object`], and everything in between
/// is collected into [`Unit::Text`] runs. No empty units are produced.
#[must_use]
pub fn segment(text: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut run = String::new();
    let mut resume_at = 0;

    for (idx, grapheme) in grapheme_indices(text) {
        if idx < resume_at {
            continue;
        }
        if is_emoji(grapheme) {
            flush_run(&mut run, &mut units);
            units.push(Unit::emoji(grapheme));
            continue;
        }
        if grapheme.starts_with(OBJECT_REPLACEMENT) {
            if let Some((id, consumed)) = parse_object(&text[idx..]) {
                flush_run(&mut run, &mut units);
                units.push(Unit::object(id));
                resume_at = idx + consumed;
                continue;
            }
        }
        run.push_str(grapheme);
    }
    flush_run(&mut run, &mut units);
    units
}

fn flush_run(run: &mut String, units: &mut Vec<Unit>) {
    if !run.is_empty() {
        units.push(Unit::Text(std::mem::take(run)));
    }
}

/// Parse `"\u{FFFC}[id]"` at the start of `text`, returning the id and the
/// number of bytes consumed.
fn parse_object(text: &str) -> Option<(&str, usize)> {
    let rest = text.strip_prefix(OBJECT_REPLACEMENT)?.strip_prefix('[')?;
    let close = rest.find([']', '\n'])?;
    if rest[close..].starts_with('\n') {
        return None;
    }
    let id = &rest[..close];
    let consumed = OBJECT_REPLACEMENT.len_utf8() + 1 + close + 1;
    Some((id, consumed))
}
