//! Detection and removal of completed rows.

use crate::field::{
    Field,
    ROWS,
};

/// A single piece spans at most four rows, so no more can complete at once.
pub const MAX_FULL_ROWS: usize = 4;

/// Indices of full rows in ascending order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FullRows {
    rows: [u8; MAX_FULL_ROWS],
    len: u8,
}

impl FullRows {
    fn push(&mut self, row: usize) -> bool {
        let Some(slot) = self.rows.get_mut(self.len as usize) else {
            return false;
        };
        *slot = row as u8;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows[..self.len()].iter().map(|&r| r as usize)
    }
}

/// Collect the rows where every column is occupied, top to bottom.
///
/// Scanning stops after [`MAX_FULL_ROWS`] hits.
pub fn scan_full_rows(field: &Field) -> FullRows {
    let mut full = FullRows::default();
    for row in 0..ROWS {
        if field.is_row_full(row) && !full.push(row) {
            break;
        }
    }
    full
}

/// Remove `full` rows from the field, shifting everything above each one
/// down by a row. Returns how many rows were removed.
///
/// Rows are processed in ascending order; a collapse only moves rows above
/// the one removed, so the remaining (lower) indices stay valid.
pub fn compact(field: &mut Field, full: &FullRows) -> usize {
    for row in full.iter() {
        field.collapse_row(row);
    }
    full.len()
}
