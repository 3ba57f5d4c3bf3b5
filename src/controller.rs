//! The falling piece: position, rotation and collision checks.
//!
//! All checks test the *static* field, so the piece has to be erased from the
//! field before asking whether it may move, and placed again afterwards.

use crate::{
    field::{
        COLS,
        Field,
        ROWS,
    },
    piece::{
        Pattern,
        Shape,
    },
};

/// Field row a new piece's bounding box starts at.
pub const SPAWN_ROW: usize = 0;
/// Field column a new piece's bounding box starts at.
pub const SPAWN_COL: usize = 2;

/// Field-relative anchor of a piece's bounding box (top-left corner).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Origin {
    pub row: usize,
    pub col: usize,
}

/// A one-cell move of the active piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    Down,
    Left,
    Right,
}

/// Cell rectangle covered by a piece's bounding box; `bottom` and `right`
/// are exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Piece {
    shape: Shape,
    rotation: u8,
    origin: Origin,
}

impl Piece {
    /// A piece in its first rotation state at the spawn origin.
    pub const fn spawn(shape: Shape) -> Self {
        Self {
            shape,
            rotation: 0,
            origin: Origin {
                row: SPAWN_ROW,
                col: SPAWN_COL,
            },
        }
    }

    pub const fn shape(&self) -> Shape {
        self.shape
    }

    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    pub const fn origin(&self) -> Origin {
        self.origin
    }

    pub fn pattern(&self) -> &'static Pattern {
        self.shape.pattern(self.rotation)
    }

    pub fn width(&self) -> usize {
        self.pattern().width()
    }

    pub fn height(&self) -> usize {
        self.pattern().height()
    }

    pub fn span(&self) -> Span {
        Span {
            top: self.origin.row,
            bottom: self.origin.row + self.height(),
            left: self.origin.col,
            right: self.origin.col + self.width(),
        }
    }

    /// Absolute field coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let Origin { row, col } = self.origin;
        self.pattern().cells().map(move |(r, c)| (row + r, col + c))
    }

    /// OR the piece into the field. Not guarded against double placement.
    pub fn place(&self, field: &mut Field) {
        for (r, c) in self.cells() {
            field.set(r, c, true);
        }
    }

    /// Clear the piece's cells from the field.
    pub fn erase(&self, field: &mut Field) {
        for (r, c) in self.cells() {
            field.set(r, c, false);
        }
    }

    /// Whether any occupied cell covers an occupied field cell.
    pub fn overlaps(&self, field: &Field) -> bool {
        self.cells().any(|(r, c)| field.get(r, c))
    }

    /// Origin after `motion`, or `None` when it would leave the field.
    fn shifted_origin(&self, motion: Motion) -> Option<Origin> {
        let Origin { row, col } = self.origin;
        match motion {
            Motion::Down => (row + self.height() < ROWS).then_some(Origin { row: row + 1, col }),
            Motion::Left => col.checked_sub(1).map(|col| Origin { row, col }),
            Motion::Right => (col + self.width() < COLS).then_some(Origin { row, col: col + 1 }),
        }
    }

    /// Edge and overlap check for a one-cell move. The piece must be erased.
    pub fn can_shift(&self, field: &Field, motion: Motion) -> bool {
        match self.shifted_origin(motion) {
            Some(origin) => !Piece { origin, ..*self }.overlaps(field),
            None => false,
        }
    }

    pub fn can_move_down(&self, field: &Field) -> bool {
        self.can_shift(field, Motion::Down)
    }

    pub fn can_move_left(&self, field: &Field) -> bool {
        self.can_shift(field, Motion::Left)
    }

    pub fn can_move_right(&self, field: &Field) -> bool {
        self.can_shift(field, Motion::Right)
    }

    /// Commit a move already validated with [`Piece::can_shift`].
    ///
    /// Only the origin changes; the caller re-places the piece.
    pub fn shift(&mut self, motion: Motion) {
        if let Some(origin) = self.shifted_origin(motion) {
            self.origin = origin;
        }
    }

    /// Advance to the next rotation state if its bounding box stays inside
    /// the field and the piece could currently move down.
    ///
    /// Settled blocks are not checked against the rotated pattern. The piece
    /// must be erased. Returns whether the rotation was committed.
    pub fn try_rotate(&mut self, field: &Field) -> bool {
        let next = self.shape.next_rotation(self.rotation);
        let pattern = self.shape.pattern(next);
        let Origin { row, col } = self.origin;

        if row + pattern.height() > ROWS || col + pattern.width() > COLS {
            trace!("rotation rejected: box leaves the field at ({}, {})", row, col);
            return false;
        }
        if !self.can_move_down(field) {
            trace!("rotation rejected: piece is resting");
            return false;
        }

        self.rotation = next;
        true
    }

    #[cfg(test)]
    pub(crate) fn at(shape: Shape, rotation: u8, row: usize, col: usize) -> Self {
        Self {
            shape,
            rotation,
            origin: Origin { row, col },
        }
    }
}
