//! Shared helpers for integration tests.

#![allow(dead_code)]

use pieceweave::{Decoration, PieceTable, Source};
use std::fmt::Write;
use tracing::Level;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// One line per piece: source, buffer range, foreground, and text.
pub fn piece_layout(table: &PieceTable) -> String {
    let mut out = String::new();
    for piece in table.pieces() {
        let source = match piece.source() {
            Source::Original => "orig",
            Source::Addition => "add",
        };
        let foreground = match piece.decoration() {
            Decoration::Text(text) => text
                .foreground()
                .map_or_else(|| "-".to_string(), |color| color.to_string()),
            Decoration::Image(_) => "image".to_string(),
            _ => "?".to_string(),
        };
        let _ = writeln!(
            out,
            "{source} {}..{} {foreground} {:?}",
            piece.range().start,
            piece.range().end,
            table.piece_text(piece)
        );
    }
    out
}

/// Assert the structural invariants that must hold after every mutation.
pub fn assert_well_formed(table: &PieceTable) {
    assert!(
        table.pieces().iter().all(|piece| !piece.is_empty()),
        "empty piece in list"
    );
    assert_eq!(table.text_len(), table.text().chars().count());
    let internal: usize = table.pieces().iter().map(|piece| piece.len()).sum();
    assert_eq!(internal, table.internal_len());
    let external: usize = table.pieces().iter().map(|piece| piece.external_len()).sum();
    assert_eq!(external, table.text_len());
}
