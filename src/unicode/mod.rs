//! Unicode utilities for grapheme handling and emoji classification.

mod grapheme;

pub use grapheme::{
    EMOJI_PLACEHOLDER, OBJECT_REPLACEMENT, grapheme_count, grapheme_indices, is_emoji,
    is_pictographic,
};
