//! The seven piece shapes and their rotation tables.
//!
//! Every `(shape, rotation)` pair maps to a literal pattern with its own
//! bounding box. Nothing is rotated at run time.

/// Size of the square a pattern is drawn in.
pub const PATTERN_SIZE: usize = 4;

/// Occupancy pattern of one rotation state.
///
/// Each entry of `rows` is a 4-bit mask where the most significant bit is
/// the leftmost column, so `0b1110` reads as `###.`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern {
    rows: [u8; PATTERN_SIZE],
    width: u8,
    height: u8,
}

impl Pattern {
    const fn new(width: u8, height: u8, rows: [u8; PATTERN_SIZE]) -> Self {
        Self {
            rows,
            width,
            height,
        }
    }

    pub const fn width(&self) -> usize {
        self.width as usize
    }

    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Whether the cell at `(row, col)` inside the bounding box is occupied.
    pub const fn is_set(&self, row: usize, col: usize) -> bool {
        if row >= PATTERN_SIZE || col >= PATTERN_SIZE {
            return false;
        }
        (self.rows[row] >> (PATTERN_SIZE - 1 - col)) & 1 == 1
    }

    /// Occupied cells as `(row, col)` offsets from the bounding-box origin.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |r| {
            (0..self.width())
                .filter(move |&c| self.is_set(r, c))
                .map(move |c| (r, c))
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Shape {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

impl Shape {
    pub const COUNT: u8 = 7;

    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    /// Shape for `index`, reduced modulo the number of shapes.
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % Self::COUNT) as usize]
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    fn rotations(self) -> &'static [Pattern] {
        match self {
            Shape::I => &I_ROTATIONS,
            Shape::J => &J_ROTATIONS,
            Shape::L => &L_ROTATIONS,
            Shape::O => &O_ROTATIONS,
            Shape::S => &S_ROTATIONS,
            Shape::T => &T_ROTATIONS,
            Shape::Z => &Z_ROTATIONS,
        }
    }

    /// Number of distinct rotation states: 1 for O, 2 for I/S/Z, 4 for J/L/T.
    pub fn rotation_period(self) -> u8 {
        self.rotations().len() as u8
    }

    /// Pattern for `rotation`, taken modulo the rotation period.
    pub fn pattern(self, rotation: u8) -> &'static Pattern {
        let rotations = self.rotations();
        &rotations[rotation as usize % rotations.len()]
    }

    /// Rotation index that follows `rotation`.
    pub fn next_rotation(self, rotation: u8) -> u8 {
        (rotation + 1) % self.rotation_period()
    }
}

const I_ROTATIONS: [Pattern; 2] = [
    Pattern::new(4, 1, [0b1111, 0, 0, 0]),
    Pattern::new(1, 4, [0b1000, 0b1000, 0b1000, 0b1000]),
];

const J_ROTATIONS: [Pattern; 4] = [
    Pattern::new(3, 2, [0b1000, 0b1110, 0, 0]),
    Pattern::new(2, 3, [0b1100, 0b1000, 0b1000, 0]),
    Pattern::new(3, 2, [0b1110, 0b0010, 0, 0]),
    Pattern::new(2, 3, [0b0100, 0b0100, 0b1100, 0]),
];

const L_ROTATIONS: [Pattern; 4] = [
    Pattern::new(3, 2, [0b0010, 0b1110, 0, 0]),
    Pattern::new(2, 3, [0b1000, 0b1000, 0b1100, 0]),
    Pattern::new(3, 2, [0b1110, 0b1000, 0, 0]),
    Pattern::new(2, 3, [0b1100, 0b0100, 0b0100, 0]),
];

const O_ROTATIONS: [Pattern; 1] = [Pattern::new(2, 2, [0b1100, 0b1100, 0, 0])];

const S_ROTATIONS: [Pattern; 2] = [
    Pattern::new(3, 2, [0b0110, 0b1100, 0, 0]),
    Pattern::new(2, 3, [0b1000, 0b1100, 0b0100, 0]),
];

const T_ROTATIONS: [Pattern; 4] = [
    Pattern::new(3, 2, [0b1110, 0b0100, 0, 0]),
    Pattern::new(2, 3, [0b0100, 0b1100, 0b0100, 0]),
    Pattern::new(3, 2, [0b0100, 0b1110, 0, 0]),
    Pattern::new(2, 3, [0b1000, 0b1100, 0b1000, 0]),
];

const Z_ROTATIONS: [Pattern; 2] = [
    Pattern::new(3, 2, [0b1100, 0b0110, 0, 0]),
    Pattern::new(2, 3, [0b0100, 0b1100, 0b1000, 0]),
];
