//! Next-piece selection.
//!
//! Mixes a free-running hardware counter with the fall-timer count and the
//! score. Only meant to look varied; it never repeats the active shape.

use crate::piece::Shape;

/// The values the next shape is derived from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entropy {
    /// Free-running hardware counter.
    pub counter: u32,
    /// Ticks since the last fall attempt.
    pub ticks: u32,
    /// Current session score.
    pub score: u32,
}

/// Pick a shape that differs from `exclude`.
pub fn next_shape(exclude: Shape, entropy: Entropy) -> Shape {
    let mixed = entropy.counter.wrapping_add(entropy.ticks) ^ entropy.score;
    let mut index = (mixed % u32::from(Shape::COUNT)) as u8;
    if index == exclude.index() {
        index = (index + 1) % Shape::COUNT;
    }
    Shape::from_index(index)
}
