//! Fuzz target for unit segmentation.
//!
//! Segmenting must be lossless and never produce empty units.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pieceweave::UnitBuffer;
use pieceweave::text::segment;

fuzz_target!(|data: &str| {
    let units = segment(data);
    assert!(units.iter().all(|unit| unit.internal_len() > 0));

    let buffer = UnitBuffer::from_units(units);
    assert_eq!(buffer.text(), data);
    assert_eq!(buffer.external_len(), data.chars().count());
});
