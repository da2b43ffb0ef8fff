//! Row/column addressing over a table-decorated paragraph.
//!
//! A table is stored as one paragraph whose cells are separated by
//! [`TABLE_SEPARATOR`] in row-major order, so a `rows x columns` table holds
//! `rows * columns - 1` separators. Short tables read the missing trailing
//! cells as empty; surplus separators stay inside the last cell.

use crate::text::fragment::FragmentContent;
use crate::text::piece_table::PieceTable;
use std::ops::Range;
use tracing::{trace, warn};

/// Zero-width separator between table cells (U+2063 INVISIBLE SEPARATOR).
pub const TABLE_SEPARATOR: char = '\u{2063}';

/// Where to add a column or row relative to the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Before,
    After,
}

/// One cell: its internal range in the document and visible text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub range: Range<usize>,
    pub text: String,
}

/// A parsed table snapshot. Produced from a [`PieceTable`] and detached
/// from it; re-create after edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    start: usize,
    end: usize,
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Table {
    /// Parse the table starting at internal offset `paragraph_start`.
    ///
    /// The table runs to the end of the paragraph. Zero dimensions are
    /// treated as one; dimensions far beyond the parsed cells are clamped.
    #[must_use]
    pub fn new(table: &PieceTable, paragraph_start: usize, rows: usize, columns: usize) -> Self {
        if rows == 0 || columns == 0 {
            warn!(rows, columns, "degenerate table dimensions, using at least 1x1");
        }
        let start = paragraph_start.min(table.internal_len());

        let mut segments: Vec<Cell> = Vec::new();
        let mut current = Cell {
            range: start..start,
            text: String::new(),
        };
        let mut end = table.internal_len();
        'walk: for fragment in table.fragments(start..table.internal_len()) {
            match fragment.content {
                FragmentContent::Text(text) => {
                    let mut offset = fragment.range.start;
                    for ch in text.chars() {
                        match ch {
                            '\n' => {
                                end = offset;
                                break 'walk;
                            }
                            TABLE_SEPARATOR => {
                                current.range.end = offset;
                                let next = Cell {
                                    range: offset + 1..offset + 1,
                                    text: String::new(),
                                };
                                segments.push(std::mem::replace(&mut current, next));
                            }
                            _ => current.text.push(ch),
                        }
                        offset += 1;
                    }
                }
                _ => current.text.push_str(&fragment.external_text()),
            }
        }
        current.range.end = end;
        segments.push(current);

        let (rows, columns) = fit_dimensions(rows.max(1), columns.max(1), segments.len());
        let count = rows * columns;
        if segments.len() != count {
            trace!(
                expected = count,
                found = segments.len(),
                "table cell count mismatch"
            );
        }
        let cells = normalize_cells(segments, count, end);
        Self {
            start,
            end,
            rows,
            columns,
            cells,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Internal range of the table text, excluding the paragraph newline.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a row and column.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Absolute internal offset of each cell start in row-major order, plus
    /// the end of the table as a final sentinel.
    #[must_use]
    pub fn table_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .map(|cell| cell.range.start)
            .chain(std::iter::once(self.end))
            .collect()
    }

    /// Row containing an internal offset. Offsets outside the table clamp to
    /// the first or last cell.
    #[must_use]
    pub fn current_row(&self, offset: usize) -> usize {
        self.cell_index(offset) / self.columns
    }

    /// Column containing an internal offset.
    #[must_use]
    pub fn current_column(&self, offset: usize) -> usize {
        self.cell_index(offset) % self.columns
    }

    fn cell_index(&self, offset: usize) -> usize {
        // A separator belongs to the cell it closes.
        let index = self
            .cells
            .partition_point(|cell| cell.range.start <= offset);
        index.saturating_sub(1)
    }

    /// Table text with an empty column added next to the one containing
    /// `offset`.
    #[must_use]
    pub fn add_column_and_get_table_text(&self, offset: usize, direction: Direction) -> String {
        let column = match direction {
            Direction::Before => self.current_column(offset),
            Direction::After => self.current_column(offset) + 1,
        };
        let mut grid = self.grid();
        for row in &mut grid {
            row.insert(column, "");
        }
        join(&grid)
    }

    /// Table text without the column containing `offset`.
    #[must_use]
    pub fn remove_column_and_get_text(&self, offset: usize) -> String {
        let column = self.current_column(offset);
        let mut grid = self.grid();
        for row in &mut grid {
            row.remove(column);
        }
        join(&grid)
    }

    /// Table text with an empty row added next to the one containing
    /// `offset`.
    #[must_use]
    pub fn add_row_and_get_table_text(&self, offset: usize, direction: Direction) -> String {
        let row = match direction {
            Direction::Before => self.current_row(offset),
            Direction::After => self.current_row(offset) + 1,
        };
        let mut grid = self.grid();
        grid.insert(row, vec![""; self.columns]);
        join(&grid)
    }

    /// Table text without the row containing `offset`.
    #[must_use]
    pub fn remove_row_and_get_text(&self, offset: usize) -> String {
        let row = self.current_row(offset);
        let mut grid = self.grid();
        grid.remove(row);
        join(&grid)
    }

    fn grid(&self) -> Vec<Vec<&str>> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().map(|cell| cell.text.as_str()).collect())
            .collect()
    }
}

/// Clamp declared dimensions to what the parsed text can fill.
///
/// A row may be at most one cell wider than the parsed cell count, and the
/// grid may miss at most one row of cells. Anything larger is re-laid out
/// over the parsed cells.
fn fit_dimensions(rows: usize, columns: usize, parsed: usize) -> (usize, usize) {
    let fits = columns <= parsed + 1
        && rows
            .checked_mul(columns)
            .is_some_and(|count| count <= parsed + columns);
    if fits {
        return (rows, columns);
    }
    let fitted_columns = columns.min(parsed);
    let fitted_rows = parsed.div_ceil(fitted_columns);
    warn!(
        rows,
        columns,
        parsed,
        fitted_rows,
        fitted_columns,
        "table dimensions exceed parsed cells"
    );
    (fitted_rows, fitted_columns)
}

/// Fit parsed segments to exactly `count` cells.
fn normalize_cells(mut segments: Vec<Cell>, count: usize, end: usize) -> Vec<Cell> {
    if segments.len() > count {
        let surplus = segments.split_off(count);
        if let Some(last) = segments.last_mut() {
            for cell in surplus {
                last.text.push(TABLE_SEPARATOR);
                last.text.push_str(&cell.text);
                last.range.end = cell.range.end;
            }
        }
    }
    while segments.len() < count {
        segments.push(Cell {
            range: end..end,
            text: String::new(),
        });
    }
    segments
}

fn join(grid: &[Vec<&str>]) -> String {
    let separator = TABLE_SEPARATOR.to_string();
    grid.iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(&separator)
}
