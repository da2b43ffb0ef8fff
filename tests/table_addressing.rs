//! Row/column addressing of table paragraphs.

mod common;

use common::init_logging;
use pieceweave::{Decoration, Direction, PieceTable, TABLE_SEPARATOR, TableDecoration};

const S: char = TABLE_SEPARATOR;

/// A heading paragraph followed by a 2x3 table and a trailing paragraph.
fn document() -> PieceTable {
    let mut table = PieceTable::with_text(&format!(
        "Prices\nitem{S}qty{S}cost{S}tea{S}2{S}😀\nTotal"
    ));
    table
        .decorate(7, 7, &Decoration::from(TableDecoration::new(2, 3)))
        .unwrap();
    table
}

#[test]
fn positions_cover_every_cell() {
    init_logging();
    let doc = document();
    let table = doc.table_at(7).unwrap();
    assert_eq!((table.rows(), table.columns()), (2, 3));
    // item(7..11) qty(12..15) cost(16..20) tea(21..24) 2(25) 😀(27)
    assert_eq!(table.table_positions(), vec![7, 12, 16, 21, 25, 27, 28]);
    assert_eq!(table.cell(1, 2).unwrap().text, "😀");
}

#[test]
fn rows_and_columns_from_offsets() {
    let doc = document();
    let table = doc.table_at(7).unwrap();
    let cells: Vec<(usize, usize)> = [7, 13, 19, 22, 25, 27]
        .into_iter()
        .map(|offset| (table.current_row(offset), table.current_column(offset)))
        .collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn column_edits_rewrite_every_row() {
    let doc = document();
    let table = doc.table_at(13).unwrap();

    let added = table.add_column_and_get_table_text(13, Direction::After);
    assert_eq!(added, format!("item{S}qty{S}{S}cost{S}tea{S}2{S}{S}😀"));

    let first = table.add_column_and_get_table_text(7, Direction::Before);
    assert_eq!(first, format!("{S}item{S}qty{S}cost{S}{S}tea{S}2{S}😀"));
    assert!(!first.contains('\n'));

    let removed = table.remove_column_and_get_text(13);
    assert_eq!(removed, format!("item{S}cost{S}tea{S}😀"));
}

#[test]
fn row_edits() {
    let doc = document();
    let table = doc.table_at(22).unwrap();
    assert_eq!(
        table.add_row_and_get_table_text(22, Direction::Before),
        format!("item{S}qty{S}cost{S}{S}{S}{S}tea{S}2{S}😀")
    );
    assert_eq!(
        table.remove_row_and_get_text(22),
        format!("item{S}qty{S}cost")
    );
}

#[test]
fn replacing_table_text_round_trips() {
    let mut doc = document();
    let table = doc.table_at(7).unwrap();
    let text = table.add_column_and_get_table_text(7, Direction::After);
    let range = table.range();
    let (start, end) = (
        doc.external_position(range.start),
        doc.external_position(range.end),
    );

    doc.delete(start, end - start).unwrap();
    doc.insert(&text, start).unwrap();
    // The new text inherits the heading paragraph; re-apply the grown layout.
    let widened = TableDecoration::new(2, 3).with_column_inserted(1);
    doc.decorate(start, start, &Decoration::from(widened)).unwrap();

    let table = doc.table_at(start).unwrap();
    assert_eq!((table.rows(), table.columns()), (2, 4));
    assert_eq!(table.cell(0, 1).unwrap().text, "");
    assert_eq!(table.cell(1, 3).unwrap().text, "😀");
    assert!(doc.text().ends_with("😀\nTotal"));
}
