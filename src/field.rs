//! The 24×8 occupancy grid.
//!
//! Row 0 is the top of the playing field. A cell is set when it holds a
//! settled block or is covered by the active piece while that piece is placed.

/// Number of rows in the playing field.
pub const ROWS: usize = 24;
/// Number of columns in the playing field.
pub const COLS: usize = 8;

/// One row of the field, indexed by column.
pub type Row = [bool; COLS];

/// Ground truth for the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    cells: [Row; ROWS],
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    pub const fn new() -> Self {
        Self {
            cells: [[false; COLS]; ROWS],
        }
    }

    /// Occupancy of `(row, col)`; anything outside the grid reads as empty.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Set or clear a cell. Writes outside the grid are ignored.
    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = occupied;
        }
    }

    pub fn row(&self, row: usize) -> &Row {
        &self.cells[row]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.cells.iter()
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&c| c)
    }

    pub fn clear(&mut self) {
        self.cells = [[false; COLS]; ROWS];
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }

    /// Drop `row`: every row above it moves down by one and row 0 is emptied.
    pub(crate) fn collapse_row(&mut self, row: usize) {
        for r in (1..=row).rev() {
            self.cells[r] = self.cells[r - 1];
        }
        self.cells[0] = [false; COLS];
    }

    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, row: usize) {
        self.cells[row] = [true; COLS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_empty_and_writes_ignored() {
        let mut field = Field::new();
        field.set(ROWS, 0, true);
        field.set(0, COLS, true);
        assert_eq!(field.count(), 0);
        assert!(!field.get(ROWS + 3, COLS + 3));
    }

    #[test]
    fn collapse_row_shifts_everything_above() {
        let mut field = Field::new();
        field.set(0, 1, true);
        field.set(3, 4, true);
        field.fill_row(5);
        field.collapse_row(5);

        assert!(field.row(0).iter().all(|&c| !c));
        assert!(field.get(1, 1));
        assert!(field.get(4, 4));
        assert!(!field.is_row_full(5));
        assert_eq!(field.count(), 2);
    }
}
