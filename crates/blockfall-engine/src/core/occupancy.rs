use super::{COLS, ROWS};

const FULL_ROW_MASK: u16 = (1 << COLS) - 1;

/// Single row of the occupancy grid.
///
/// Bit `x` is set when column `x` is occupied. Only the low [`COLS`] bits are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyRow {
    bits: u16,
}

impl OccupancyRow {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Checks if every column of the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits & FULL_ROW_MASK == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        self.bits & (1 << x) != 0
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }
}

/// Bit-packed occupancy of the visible field.
///
/// This is the derived "accepted positions" view of a [`Grid`](super::grid::Grid):
/// it is rebuilt from the locked cells after every mutation and answers
/// collision queries in constant time. Cells above the visible field are not
/// represented here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    rows: [OccupancyRow; ROWS],
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Occupancy {
    pub const EMPTY: Self = Self {
        rows: [OccupancyRow::EMPTY; ROWS],
    };

    /// Rebuilds the occupancy from an iterator of locked cells.
    ///
    /// Cells outside the visible field are ignored.
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut occupancy = Self::EMPTY;
        for (x, y) in cells {
            if let Some((x, y)) = visible_cell(x, y) {
                occupancy.rows[y].occupy_cell(x);
            }
        }
        occupancy
    }

    /// Checks if the visible cell at `(x, y)` is occupied.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y].is_cell_occupied(x)
    }

    #[must_use]
    pub fn row(&self, y: usize) -> OccupancyRow {
        self.rows[y]
    }

    pub fn rows(&self) -> impl Iterator<Item = OccupancyRow> + '_ {
        self.rows.iter().copied()
    }

    /// Height of every column: rows from the topmost occupied cell down to the floor.
    #[must_use]
    pub fn column_heights(&self) -> [usize; COLS] {
        let mut heights = [0; COLS];
        for (x, height) in heights.iter_mut().enumerate() {
            if let Some(top) = (0..ROWS).find(|&y| self.is_occupied(x, y)) {
                *height = ROWS - top;
            }
        }
        heights
    }

    /// Creates an `Occupancy` from ASCII art for testing.
    ///
    /// '#' is an occupied cell, '.' an empty one. Rows are given top to bottom
    /// and aligned to the floor, so fewer than [`ROWS`] lines describe the bottom
    /// of the field.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly [`COLS`] cells or there are too many rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut occupancy = Self::EMPTY;
        for (x, y) in ascii_cells(art) {
            occupancy.rows[y].occupy_cell(x);
        }
        occupancy
    }
}

/// Converts a signed cell coordinate into a visible-field index, if it is inside the field.
pub(crate) fn visible_cell(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < COLS)?;
    let y = usize::try_from(y).ok().filter(|&y| y < ROWS)?;
    Some((x, y))
}

/// Parses floor-aligned ASCII art into visible cell coordinates.
pub(crate) fn ascii_cells(art: &str) -> Vec<(usize, usize)> {
    let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
    assert!(lines.len() <= ROWS, "at most {ROWS} rows, got {}", lines.len());
    let offset = ROWS - lines.len();
    let mut cells = vec![];
    for (i, line) in lines.iter().enumerate() {
        let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
        assert_eq!(
            chars.len(),
            COLS,
            "Each row must have exactly {COLS} cells, got {} at row {i}",
            chars.len(),
        );
        for (x, &ch) in chars.iter().enumerate() {
            if ch == '#' {
                cells.push((x, offset + i));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_occupancy() {
        let occupancy = Occupancy::EMPTY;
        for y in 0..ROWS {
            for x in 0..COLS {
                assert!(!occupancy.is_occupied(x, y));
            }
        }
        assert_eq!(occupancy.column_heights(), [0; COLS]);
    }

    #[test]
    fn test_from_cells_ignores_hidden_rows() {
        let occupancy = Occupancy::from_cells([(0, -1), (3, 19), (10, 5), (-1, 5)]);
        assert!(occupancy.is_occupied(3, 19));
        assert_eq!(occupancy.rows().filter(|r| *r != OccupancyRow::EMPTY).count(), 1);
    }

    #[test]
    fn test_row_is_filled() {
        let mut row = OccupancyRow::EMPTY;
        for x in 0..COLS - 1 {
            row.occupy_cell(x);
        }
        assert!(!row.is_filled());
        row.occupy_cell(COLS - 1);
        assert!(row.is_filled());
        assert!((0..COLS).all(|x| row.is_cell_occupied(x)));
    }

    #[test]
    fn test_column_heights_from_ascii() {
        let occupancy = Occupancy::from_ascii(
            "
            #.........
            #.#.......
            ###......#
            ",
        );
        assert_eq!(occupancy.column_heights(), [3, 1, 2, 0, 0, 0, 0, 0, 0, 1]);
        assert!(occupancy.is_occupied(0, ROWS - 3));
        assert!(!occupancy.is_occupied(1, ROWS - 2));
    }

    #[test]
    #[should_panic(expected = "exactly")]
    fn test_from_ascii_rejects_short_rows() {
        let _ = Occupancy::from_ascii("###");
    }
}
