//! Undo/redo through the editing session.

mod common;

use common::{assert_well_formed, init_logging, piece_layout};
use pieceweave::text::{CaretState, HistoryEntry, redo, undo};
use pieceweave::{
    ChangeEvent, Command, Decoration, EditOptions, PieceTable, Rgba, RichEditBuffer,
    TextDecoration,
};
use std::cell::RefCell;
use std::rc::Rc;

fn colored(color: Rgba) -> TextDecoration {
    TextDecoration::builder().foreground(color).build()
}

#[test]
fn delete_undo_restores_per_run_decorations() {
    init_logging();
    let mut edit = RichEditBuffer::with_text("red green blue");
    edit.decorate(0, 3, colored(Rgba::RED)).unwrap();
    edit.decorate(4, 9, colored(Rgba::GREEN)).unwrap();
    edit.decorate(10, 14, colored(Rgba::BLUE)).unwrap();
    let before = piece_layout(edit.table());

    edit.delete(1, 11).unwrap();
    assert_eq!(edit.text(), "rue");
    insta::assert_snapshot!(piece_layout(edit.table()), @r#"
    orig 0..1 #FF0000 "r"
    orig 12..14 #0000FF "ue"
    "#);

    assert!(edit.undo());
    assert_eq!(edit.text(), "red green blue");
    assert_eq!(piece_layout(edit.table()), before);
    assert_well_formed(edit.table());
}

#[test]
fn undo_all_then_redo_all() {
    init_logging();
    let mut edit = RichEditBuffer::with_text("Hello");
    edit.append(" World").unwrap();
    edit.insert("dear ", 6).unwrap();
    edit.delete(0, 1).unwrap();
    edit.decorate(0, 4, colored(Rgba::RED)).unwrap();
    let edited = edit.table().styled_runs();
    assert_eq!(edit.text(), "ello dear World");

    let mut undone = 0;
    while edit.undo() {
        undone += 1;
    }
    assert_eq!(undone, 4);
    assert_eq!(edit.text(), "Hello");
    assert_eq!(edit.table().styled_runs().len(), 1);

    while edit.redo() {}
    assert_eq!(edit.text(), "ello dear World");
    assert_eq!(edit.table().styled_runs(), edited);
}

#[test]
fn new_edit_discards_redo_branch() {
    let mut edit = RichEditBuffer::with_text("abc");
    edit.append("d").unwrap();
    edit.append("e").unwrap();
    edit.undo();
    edit.undo();
    assert!(edit.can_redo());

    edit.insert("X", 0).unwrap();
    assert!(!edit.can_redo());
    assert!(!edit.redo());
    assert_eq!(edit.text(), "Xabc");
}

#[test]
fn undo_restores_caret_and_selection() {
    let mut edit = RichEditBuffer::with_text("one two");
    edit.set_selection(4..7).unwrap();
    edit.execute(Command::delete(4, 3)).unwrap();
    assert_eq!(edit.caret(), 4);
    assert!(edit.selection().is_none());

    edit.undo();
    assert_eq!(edit.caret(), 7);
    assert_eq!(edit.selection(), Some(&(4..7)));

    edit.redo();
    assert_eq!(edit.caret(), 4);
    assert_eq!(edit.text(), "one ");
}

#[test]
fn undo_emits_inverse_events() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut edit = RichEditBuffer::with_text("ab😀cd");
    let sink = Rc::clone(&events);
    edit.add_change_listener(move |event| sink.borrow_mut().push(event.clone()));

    edit.delete(1, 3).unwrap();
    edit.undo();
    edit.decorate(0, 2, colored(Rgba::GREEN)).unwrap();
    edit.undo();

    assert_eq!(
        *events.borrow(),
        vec![
            ChangeEvent::Delete {
                position: 1,
                length: 3
            },
            ChangeEvent::Insert {
                text: "b😀c".to_string(),
                position: 1
            },
            ChangeEvent::Decorate { start: 0, end: 2 },
            ChangeEvent::Decorate { start: 0, end: 2 },
        ]
    );
}

#[test]
fn bounded_history() {
    let options = EditOptions::default()
        .with_max_history_depth(3)
        .with_default_decoration(colored(Rgba::BLUE));
    let mut edit =
        RichEditBuffer::with_options(&pieceweave::Document::new(""), options).unwrap();
    for word in ["one ", "two ", "three ", "four "] {
        edit.append(word).unwrap();
    }
    // Nothing to inherit in an empty document: the default applies.
    assert_eq!(
        edit.table().pieces()[0].decoration(),
        &Decoration::from(colored(Rgba::BLUE))
    );

    while edit.undo() {}
    assert_eq!(edit.text(), "one ");
}

#[test]
fn free_functions_drive_a_plain_table() {
    let mut table = PieceTable::with_text("keep this");
    let mut entry = HistoryEntry::new(
        Command::decorate(5, 9, colored(Rgba::RED)),
        CaretState::at(0),
        CaretState::at(0),
    );
    redo(&mut entry, &mut table).unwrap();
    assert_eq!(table.styled_runs().len(), 2);
    undo(&entry, &mut table);
    assert_eq!(table.styled_runs().len(), 1);
}
