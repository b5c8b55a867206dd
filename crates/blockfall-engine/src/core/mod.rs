pub use self::{grid::*, occupancy::*, piece::*};

pub(crate) mod grid;
pub(crate) mod occupancy;
pub(crate) mod piece;

/// Number of visible columns.
pub const COLS: usize = 10;
/// Number of visible rows.
pub const ROWS: usize = 20;
