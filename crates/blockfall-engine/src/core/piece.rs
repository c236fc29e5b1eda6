use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::shape::{MAX_SHAPE_SIZE, Shape};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    /// Returns the spawn orientation of this piece.
    #[must_use]
    pub const fn template(self) -> Shape {
        PIECE_TEMPLATES[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

const PIECE_TEMPLATES: [Shape; PieceKind::LEN] = [
    // I-piece
    Shape::from_rows(&[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
    // J-piece
    Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
    // L-piece
    Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
    // O-piece
    Shape::from_rows(&[&[1, 1], &[1, 1]]),
    // S-piece
    Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
    // Z-piece
    Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
    // T-piece
    Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
];

/// Absolute cells covered by one piece.
pub type PieceCells = ArrayVec<(i32, i32), { MAX_SHAPE_SIZE * MAX_SHAPE_SIZE }>;

/// The falling piece: a kind, its current orientation, and an anchor.
///
/// The anchor `(x, y)` is the grid position of the shape matrix's top-left
/// corner. `y` may be negative while the piece is still entering from above
/// the visible grid.
///
/// Movement and rotation return candidate pieces; the caller decides whether
/// to commit them after a collision test.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, PieceKind};
///
/// let piece = ActivePiece::spawn(PieceKind::O, 10);
/// assert_eq!((piece.x(), piece.y()), (4, 0));
///
/// let candidate = piece.left().rotated();
/// assert_eq!(candidate.x(), 3);
/// assert_eq!(piece.x(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Creates a piece in its spawn orientation, horizontally centered on row 0.
    ///
    /// The anchor column is `floor(cols / 2) - ceil(width / 2)`.
    #[must_use]
    pub fn spawn(kind: PieceKind, grid_cols: usize) -> Self {
        let shape = kind.template();
        let x = to_coord(grid_cols / 2) - to_coord(shape.width().div_ceil(2));
        Self::new(kind, shape, x, 0)
    }

    #[must_use]
    pub const fn new(kind: PieceKind, shape: Shape, x: i32, y: i32) -> Self {
        Self { kind, shape, x, y }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Returns the piece turned 90° clockwise around the same anchor.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..*self
        }
    }

    /// Returns the absolute `(x, y)` grid coordinates of every set cell.
    #[must_use]
    pub fn cells(&self) -> PieceCells {
        self.shape
            .occupied_cells()
            .map(|(dx, dy)| (self.x + to_coord(dx), self.y + to_coord(dy)))
            .collect()
    }
}

pub(crate) fn to_coord(value: usize) -> i32 {
    i32::try_from(value).expect("grid coordinate should fit in i32")
}
