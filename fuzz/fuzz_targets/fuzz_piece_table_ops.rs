//! Fuzz target for piece table edit sequences.
//!
//! Applies arbitrary insert/delete/decorate/undo sequences through a
//! `RichEditBuffer` and checks that lengths stay consistent and that undoing
//! everything restores the starting text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pieceweave::{Rgba, RichEditBuffer, TextDecoration};

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { text: String, at: u16 },
    Append { text: String },
    Delete { at: u16, len: u8 },
    Decorate { at: u16, len: u8, red: bool },
    Undo,
    Redo,
}

#[derive(Arbitrary, Debug)]
struct Input {
    seed: String,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut edit = RichEditBuffer::with_text(&input.seed);
    let seed = edit.text();

    for op in input.ops.iter().take(64) {
        let len = edit.text_len();
        let clamp = |at: u16| usize::from(at) % (len + 1);
        match op {
            Op::Insert { text, at } => edit.insert(text, clamp(*at)).unwrap(),
            Op::Append { text } => edit.append(text).unwrap(),
            Op::Delete { at, len } => edit.delete(clamp(*at), usize::from(*len)).unwrap(),
            Op::Decorate { at, len: count, red } => {
                let start = clamp(*at);
                let end = (start + usize::from(*count)).min(len);
                let color = if *red { Rgba::RED } else { Rgba::GREEN };
                edit.decorate(start, end, TextDecoration::builder().foreground(color).build())
                    .unwrap();
            }
            Op::Undo => {
                edit.undo();
            }
            Op::Redo => {
                edit.redo();
            }
        }
        let table = edit.table();
        assert_eq!(table.text_len(), table.text().chars().count());
        assert!(table.pieces().iter().all(|piece| !piece.is_empty()));
    }

    while edit.undo() {}
    assert_eq!(edit.text(), seed);
});
