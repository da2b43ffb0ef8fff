//! Fuzz target for color hex parsing.
//!
//! Tests that Rgba::from_hex handles arbitrary strings without panicking and
//! that parsed colors print back to an equivalent hex string.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pieceweave::Rgba;

fuzz_target!(|data: &str| {
    if let Some(color) = Rgba::from_hex(data) {
        assert_eq!(Rgba::from_hex(&color.to_string()), Some(color));
    }

    // Try with a # prefix if not already present
    if !data.starts_with('#') {
        let _ = Rgba::from_hex(&format!("#{data}"));
    }

    // Try suffixes on char boundaries to find edge cases
    for (i, _) in data.char_indices().take(10) {
        let _ = Rgba::from_hex(&data[i..]);
    }
});
