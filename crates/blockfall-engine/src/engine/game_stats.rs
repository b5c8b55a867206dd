/// Score values for row clears.
///
/// Index corresponds to number of rows cleared simultaneously:
/// - 0 rows: 0 points
/// - 1 row: 10 points
/// - 2 rows: 25 points
/// - 3 rows: 45 points
/// - 4 rows: 70 points
const SCORE_TABLE: [u64; 5] = [0, 10, 25, 45, 70];

/// Game statistics tracking score, rows cleared, and piece count.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 25);
/// assert_eq!(stats.total_cleared_rows(), 2);
/// assert_eq!(stats.row_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_rows: usize,
    row_cleared_counter: [usize; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rows: 0,
            row_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score (sum of all row clear points).
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of row clears by count.
    ///
    /// Index `n` holds the number of locks that cleared exactly `n` rows.
    #[must_use]
    pub const fn row_cleared_counter(&self) -> &[usize; 5] {
        &self.row_cleared_counter
    }

    /// Updates statistics after a piece lock that cleared `cleared_rows` rows.
    ///
    /// Clears of more than four rows (only possible on hand-built grids) score
    /// as a four-row clear.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) {
        let bucket = cleared_rows.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        self.row_cleared_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket];
    }
}
