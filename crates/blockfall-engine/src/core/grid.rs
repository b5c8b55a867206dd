use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{
    COLS, ROWS,
    occupancy::{self, Occupancy},
    piece::{Piece, PieceKind},
};

/// The locked cells of the field together with their derived occupancy.
///
/// `locked` maps a cell coordinate to the kind of the piece that was locked
/// there; it is the source of truth. Cells above the visible field (negative
/// `y`) can be locked too, which is how a top-out is detected. `accepted` is
/// rebuilt from `locked` after every mutation, so a visible cell is free exactly
/// when it is absent from `locked`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    locked: BTreeMap<(i32, i32), PieceKind>,
    accepted: Occupancy,
}

impl Grid {
    pub const COLS: usize = COLS;
    pub const ROWS: usize = ROWS;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn locked(&self) -> &BTreeMap<(i32, i32), PieceKind> {
        &self.locked
    }

    #[must_use]
    pub fn accepted(&self) -> &Occupancy {
        &self.accepted
    }

    /// Returns the kind locked at a cell, if any.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32) -> Option<PieceKind> {
        self.locked.get(&(x, y)).copied()
    }

    /// Checks whether a piece fits at its current pose.
    ///
    /// A cell fails when its column is outside `[0, COLS)` or its row is at or
    /// below the floor. Cells in row 0 and above are exempt from the occupancy
    /// check, so a fresh piece may overlap the hidden spawn area.
    #[must_use]
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.occupied_cells().all(|(x, y)| {
            let Some(x) = usize::try_from(x).ok().filter(|&x| x < COLS) else {
                return false;
            };
            match usize::try_from(y) {
                Ok(y) => y < ROWS && (y == 0 || !self.accepted.is_occupied(x, y)),
                Err(_) => true,
            }
        })
    }

    /// Writes the piece's cells into the locked map.
    pub fn lock(&mut self, piece: &Piece) {
        for cell in piece.occupied_cells() {
            self.locked.insert(cell, piece.kind());
        }
        self.refresh();
    }

    /// Removes every full row in one pass and returns how many were cleared.
    ///
    /// Rows are scanned bottom to top. Each surviving cell moves down by the
    /// number of cleared rows beneath it, including cells above the visible field.
    pub fn clear_rows(&mut self) -> usize {
        let full_rows: ArrayVec<i32, ROWS> = (0..ROWS)
            .rev()
            .filter(|&y| self.accepted.row(y).is_filled())
            .filter_map(|y| i32::try_from(y).ok())
            .collect();
        if full_rows.is_empty() {
            return 0;
        }

        let locked = std::mem::take(&mut self.locked);
        self.locked = locked
            .into_iter()
            .filter(|((_, y), _)| !full_rows.contains(y))
            .map(|((x, y), kind)| {
                let shift: i32 = full_rows.iter().filter(|&&full| full > y).map(|_| 1).sum();
                ((x, y + shift), kind)
            })
            .collect();
        self.refresh();
        full_rows.len()
    }

    /// Checks whether any locked cell has reached row 0 or above.
    #[must_use]
    pub fn is_topped_out(&self) -> bool {
        self.locked.keys().any(|&(_, y)| y < 1)
    }

    /// Iterates over the visible locked cells with their kinds.
    pub fn visible_cells(&self) -> impl Iterator<Item = ((usize, usize), PieceKind)> + '_ {
        self.locked
            .iter()
            .filter_map(|(&(x, y), &kind)| Some((occupancy::visible_cell(x, y)?, kind)))
    }

    /// Creates a grid from floor-aligned ASCII art for testing.
    ///
    /// '#' is an occupied cell (locked as an I-piece block), '.' an empty one.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let locked = occupancy::ascii_cells(art)
            .into_iter()
            .filter_map(|(x, y)| {
                let cell = (i32::try_from(x).ok()?, i32::try_from(y).ok()?);
                Some((cell, PieceKind::I))
            })
            .collect();
        let mut grid = Self {
            locked,
            accepted: Occupancy::EMPTY,
        };
        grid.refresh();
        grid
    }

    fn refresh(&mut self) {
        self.accepted = Occupancy::from_cells(self.locked.keys().copied());
    }
}
