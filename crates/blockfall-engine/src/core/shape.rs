use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

/// Largest edge length of any piece matrix (the I-piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupancy matrix of a piece in its local coordinate space.
///
/// `(0, 0)` is the top-left cell; x grows rightward, y grows downward.
/// Shapes are plain `Copy` values: every transform returns a new matrix and
/// leaves the source untouched, so a piece template can never be modified
/// through a rotated copy.
///
/// # Example
///
/// ```
/// use blockfall_engine::Shape;
///
/// let t = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]);
/// let rotated = t.rotated_clockwise();
///
/// assert!(rotated.is_occupied(2, 1));
/// assert_eq!(rotated.rotated_clockwise().rotated_clockwise().rotated_clockwise(), t);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from rows of `0`/`1` flags.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, ragged, or larger than [`MAX_SHAPE_SIZE`].
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= MAX_SHAPE_SIZE);
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SHAPE_SIZE);

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < height {
            assert!(rows[y].len() == width);
            let mut x = 0;
            while x < width {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }

        Self {
            width: width as u8,
            height: height as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the local cell `(x, y)` is set. Cells outside the matrix are unset.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Returns the shape turned 90° clockwise.
    ///
    /// A `rows × cols` matrix becomes `cols × rows`; output cell `(row x, col y)`
    /// is input cell `(row rows-1-y, col x)`.
    #[must_use]
    pub const fn rotated_clockwise(&self) -> Self {
        let rows = self.height();
        let cols = self.width();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut x = 0;
        while x < cols {
            let mut y = 0;
            while y < rows {
                cells[x][y] = self.cells[rows - 1 - y][x];
                y += 1;
            }
            x += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Iterates over the set cells as local `(x, y)` pairs, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &set)| set.then_some((x, y)))
        })
    }

    /// Iterates over the matrix rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        let width = self.width();
        self.cells[..self.height()]
            .iter()
            .map(move |row| &row[..width])
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied_cells().count()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in self.rows() {
            let line: String = row.iter().map(|&set| if set { '#' } else { '.' }).collect();
            list.entry(&line);
        }
        list.finish()
    }
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ["010", "111", "000"]
        let mut seq = serializer.serialize_seq(Some(self.height()))?;
        for row in self.rows() {
            let line: String = row.iter().map(|&set| if set { '1' } else { '0' }).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const T: Shape = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]);

    #[test]
    fn test_rotate_square_matrix() {
        // 010      010
        // 111  ->  011
        // 000      010
        let rotated = T.rotated_clockwise();
        let expected = Shape::from_rows(&[&[0, 1, 0], &[0, 1, 1], &[0, 1, 0]]);
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_rotate_non_square_matrix_swaps_dimensions() {
        // 100      11
        // 111  ->  10
        //          10
        let j = Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]);
        let rotated = j.rotated_clockwise();
        assert_eq!((rotated.width(), rotated.height()), (2, 3));
        assert_eq!(rotated, Shape::from_rows(&[&[1, 1], &[1, 0], &[1, 0]]));
    }

    #[test]
    fn test_rotation_leaves_source_untouched() {
        let before = T;
        let _ = T.rotated_clockwise();
        assert_eq!(T, before);
    }

    #[test]
    fn test_occupied_cells_order() {
        let cells: Vec<_> = T.occupied_cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(T.cell_count(), 4);
    }

    #[test]
    fn test_is_occupied_outside_matrix() {
        assert!(!T.is_occupied(3, 0));
        assert!(!T.is_occupied(0, 3));
    }

    #[test]
    fn test_debug_and_serialize_format() {
        assert_eq!(format!("{T:?}"), "[\".#.\", \"###\", \"...\"]");
        assert_eq!(serde_json::to_string(&T).unwrap(), "[\"010\",\"111\",\"000\"]");
    }

    fn arb_shape() -> impl Strategy<Value = Shape> {
        (1..=MAX_SHAPE_SIZE, 1..=MAX_SHAPE_SIZE)
            .prop_flat_map(|(w, h)| prop::collection::vec(prop::collection::vec(0..=1u8, w), h))
            .prop_map(|rows| {
                let rows: Vec<&[u8]> = rows.iter().map(Vec::as_slice).collect();
                Shape::from_rows(&rows)
            })
    }

    proptest! {
        #[test]
        fn four_rotations_are_identity(shape in arb_shape()) {
            let rotated = shape
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            prop_assert_eq!(rotated, shape);
        }

        #[test]
        fn rotation_preserves_cell_count(shape in arb_shape()) {
            prop_assert_eq!(shape.rotated_clockwise().cell_count(), shape.cell_count());
        }
    }
}
