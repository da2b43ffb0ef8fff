//! Grid layout for table paragraphs.

use super::paragraph::TextAlignment;

/// Row/column grid laid over one paragraph.
///
/// The optional alignment grid is stored row-major with `rows * columns`
/// entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TableDecoration {
    rows: usize,
    columns: usize,
    cell_alignment: Option<Vec<TextAlignment>>,
}

impl TableDecoration {
    /// Create a table layout without per-cell alignment.
    #[must_use]
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cell_alignment: None,
        }
    }

    /// Create a builder.
    #[must_use]
    pub fn builder() -> TableDecorationBuilder {
        TableDecorationBuilder::default()
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

    /// Number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Alignment of a cell, if an alignment grid is present.
    #[must_use]
    pub fn cell_alignment(&self, row: usize, column: usize) -> Option<TextAlignment> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cell_alignment
            .as_ref()
            .and_then(|grid| grid.get(row * self.columns + column).copied())
    }

    /// Layout with one more column inserted at `column`. Alignment of the new
    /// cells defaults to left.
    #[must_use]
    pub fn with_column_inserted(&self, column: usize) -> Self {
        let column = column.min(self.columns);
        let cell_alignment = self.cell_alignment.as_ref().map(|grid| {
            grid.chunks(self.columns.max(1))
                .flat_map(|row| {
                    let mut row = row.to_vec();
                    row.insert(column.min(row.len()), TextAlignment::default());
                    row
                })
                .collect()
        });
        Self {
            rows: self.rows,
            columns: self.columns + 1,
            cell_alignment,
        }
    }

    /// Layout with `column` removed.
    #[must_use]
    pub fn with_column_removed(&self, column: usize) -> Self {
        if column >= self.columns {
            return self.clone();
        }
        let cell_alignment = self.cell_alignment.as_ref().map(|grid| {
            grid.chunks(self.columns)
                .flat_map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|&(idx, _)| idx != column)
                        .map(|(_, alignment)| *alignment)
                        .collect::<Vec<_>>()
                })
                .collect()
        });
        Self {
            rows: self.rows,
            columns: self.columns - 1,
            cell_alignment,
        }
    }

    /// Layout with one more row inserted at `row`.
    #[must_use]
    pub fn with_row_inserted(&self, row: usize) -> Self {
        let row = row.min(self.rows);
        let cell_alignment = self.cell_alignment.as_ref().map(|grid| {
            let mut grid = grid.clone();
            let at = (row * self.columns).min(grid.len());
            grid.splice(at..at, vec![TextAlignment::default(); self.columns]);
            grid
        });
        Self {
            rows: self.rows + 1,
            columns: self.columns,
            cell_alignment,
        }
    }

    /// Layout with `row` removed.
    #[must_use]
    pub fn with_row_removed(&self, row: usize) -> Self {
        if row >= self.rows {
            return self.clone();
        }
        let cell_alignment = self.cell_alignment.as_ref().map(|grid| {
            let mut grid = grid.clone();
            let start = (row * self.columns).min(grid.len());
            let end = (start + self.columns).min(grid.len());
            grid.drain(start..end);
            grid
        });
        Self {
            rows: self.rows - 1,
            columns: self.columns,
            cell_alignment,
        }
    }
}

/// Builder for [`TableDecoration`].
#[derive(Clone, Debug, Default)]
pub struct TableDecorationBuilder {
    decoration: TableDecoration,
}

impl TableDecorationBuilder {
    /// Start from a copy of another decoration.
    #[must_use]
    pub fn from_decoration(mut self, other: &TableDecoration) -> Self {
        self.decoration = other.clone();
        self
    }

    /// Set row count.
    #[must_use]
    pub fn rows(mut self, rows: usize) -> Self {
        self.decoration.rows = rows;
        self
    }

    /// Set column count.
    #[must_use]
    pub fn columns(mut self, columns: usize) -> Self {
        self.decoration.columns = columns;
        self
    }

    /// Set the row-major alignment grid.
    #[must_use]
    pub fn cell_alignment(mut self, grid: Vec<TextAlignment>) -> Self {
        self.decoration.cell_alignment = Some(grid);
        self
    }

    /// Build the final decoration.
    #[must_use]
    pub fn build(self) -> TableDecoration {
        self.decoration
    }
}
