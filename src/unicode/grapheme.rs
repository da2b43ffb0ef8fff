//! Grapheme cluster classification.
//!
//! Text entering a buffer is cut into grapheme clusters with
//! `unicode-segmentation`; clusters that render as a single emoji are kept
//! together so the buffer can store them as one atomic unit.

use unicode_segmentation::UnicodeSegmentation;

/// Storage placeholder for an emoji unit.
pub const EMOJI_PLACEHOLDER: char = '\u{E000}';

/// Object replacement character; storage placeholder for an embedded object
/// and the first character of its visible text.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const VARIATION_SELECTOR_16: char = '\u{FE0F}';
const COMBINING_KEYCAP: char = '\u{20E3}';

/// BMP code points with default emoji presentation.
const BMP_EMOJI: &[(u32, u32)] = &[
    (0x231A, 0x231B),
    (0x23E9, 0x23EC),
    (0x23F0, 0x23F0),
    (0x23F3, 0x23F3),
    (0x25FD, 0x25FE),
    (0x2614, 0x2615),
    (0x2648, 0x2653),
    (0x267F, 0x267F),
    (0x2693, 0x2693),
    (0x26A1, 0x26A1),
    (0x26AA, 0x26AB),
    (0x26BD, 0x26BE),
    (0x26C4, 0x26C5),
    (0x26CE, 0x26CE),
    (0x26D4, 0x26D4),
    (0x26EA, 0x26EA),
    (0x26F2, 0x26F3),
    (0x26F5, 0x26F5),
    (0x26FA, 0x26FA),
    (0x26FD, 0x26FD),
    (0x2705, 0x2705),
    (0x270A, 0x270B),
    (0x2728, 0x2728),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2795, 0x2797),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
];

/// Check whether a code point is pictographic (may take part in an emoji
/// sequence when joined or followed by VS16).
#[must_use]
pub fn is_pictographic(c: char) -> bool {
    let cp = u32::from(c);
    matches!(cp, 0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2300..=0x23FF | 0x2B00..=0x2BFF)
        || cp == 0x00A9
        || cp == 0x00AE
        || cp == 0x203C
        || cp == 0x2049
        || cp == 0x2122
        || cp == 0x2139
}

fn has_default_emoji_presentation(c: char) -> bool {
    let cp = u32::from(c);
    if (0x1F000..=0x1FAFF).contains(&cp) {
        return true;
    }
    BMP_EMOJI
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Check whether a grapheme cluster renders as a single emoji.
///
/// Covers default-presentation emoji, VS16 sequences, keycaps, flags
/// (regional indicator pairs), skin-tone modifiers and ZWJ sequences.
#[must_use]
pub fn is_emoji(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if has_default_emoji_presentation(first) {
        return true;
    }
    grapheme.chars().any(|c| {
        c == VARIATION_SELECTOR_16
            || c == COMBINING_KEYCAP
            || (c == ZERO_WIDTH_JOINER && is_pictographic(first))
    })
}

/// Iterate over grapheme clusters with byte indices.
pub fn grapheme_indices(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.grapheme_indices(true)
}

/// Number of grapheme clusters in a string.
#[must_use]
pub fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_emoji() {
        assert!(is_emoji("😀"));
        assert!(is_emoji("🎉"));
        assert!(is_emoji("⭐"));
    }

    #[test]
    fn test_sequences() {
        // Family emoji (ZWJ sequence)
        assert!(is_emoji("👨‍👩‍👧"));
        // Heart with VS16
        assert!(is_emoji("❤️"));
        // Keycap
        assert!(is_emoji("1️⃣"));
        // Flag
        assert!(is_emoji("🇺🇸"));
        // Skin tone modifier
        assert!(is_emoji("👍🏽"));
    }

    #[test]
    fn test_not_emoji() {
        assert!(!is_emoji("a"));
        assert!(!is_emoji("é"));
        assert!(!is_emoji("e\u{0301}"));
        assert!(!is_emoji("中"));
        // Text-presentation heart without VS16
        assert!(!is_emoji("❤"));
        assert!(!is_emoji(""));
    }

    #[test]
    fn test_grapheme_count() {
        assert_eq!(grapheme_count("a👨‍👩‍👧b"), 3);
        assert_eq!(grapheme_count("e\u{0301}"), 1);
    }
}
