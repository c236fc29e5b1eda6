use serde::{Deserialize, Serialize};

use super::piece::{ActivePiece, PieceKind, to_coord};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked material of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns the piece letter, or `.` for an empty cell.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

/// Matrix of locked piece material.
///
/// Rows are stored top to bottom; `(0, 0)` is the top-left visible cell.
/// Cells become non-empty only through [`Grid::merge`] and become empty again
/// only through [`Grid::sweep_rows`] or [`Grid::reset`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Grid, PieceKind};
///
/// let mut grid = Grid::new(10, 20);
/// let piece = ActivePiece::spawn(PieceKind::O, grid.width()).shifted(0, 18);
///
/// assert!(!grid.collides(&piece));
/// assert!(grid.collides(&piece.down()));
///
/// grid.merge(&piece);
/// assert!(!grid.block(4, 19).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<Vec<Block>>,
}

impl Grid {
    /// Creates an empty grid with `width` columns and `height` rows.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![Block::Empty; width]; height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn block(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.rows.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|b| b.is_empty())
    }

    /// Returns whether `piece` overlaps a wall, the floor, or locked material.
    ///
    /// Cells above the grid (`y < 0`) are checked against the side walls only.
    #[must_use]
    pub fn collides(&self, piece: &ActivePiece) -> bool {
        let width = to_coord(self.width);
        let height = to_coord(self.height());
        piece.cells().into_iter().any(|(x, y)| {
            if x < 0 || x >= width || y >= height {
                return true;
            }
            y >= 0 && self.block(x, y).is_some_and(|b| !b.is_empty())
        })
    }

    /// Writes the piece's cells into the grid as its kind.
    ///
    /// Cells above the grid are dropped. Any other out-of-range cell means the
    /// caller skipped the collision test.
    pub fn merge(&mut self, piece: &ActivePiece) {
        for (x, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            let cell = usize::try_from(x)
                .ok()
                .zip(usize::try_from(y).ok())
                .and_then(|(x, y)| self.rows.get_mut(y)?.get_mut(x));
            debug_assert!(cell.is_some(), "merge outside grid at ({x}, {y})");
            if let Some(cell) = cell {
                *cell = Block::Piece(piece.kind());
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. A removed row is replaced by an empty
    /// row at the top, and the same index is examined again since the row
    /// above has just moved into it.
    pub fn sweep_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.rows.len();
        while y > 0 {
            if self.rows[y - 1].iter().all(|b| !b.is_empty()) {
                let mut row = self.rows.remove(y - 1);
                row.fill(Block::Empty);
                self.rows.insert(0, row);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.fill(Block::Empty);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_block(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y][x] = block;
    }
}
