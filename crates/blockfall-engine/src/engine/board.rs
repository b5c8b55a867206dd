use crate::{
    PieceCollisionError,
    core::{Grid, Piece, PieceKind, Placement},
};

use super::{
    game_stats::GameStats,
    piece_queue::{PieceQueue, PieceRule},
};

/// Result of locking a piece into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared_rows: usize,
    pub lost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    grid: Grid,
    active: Piece,
    queue: PieceQueue,
    stats: GameStats,
    generation: u64,
    lost: bool,
}

/// Complete game state: locked grid, active piece, lookahead queue and score.
///
/// `Board` is also the placement validator used by search. [`Board::push`]
/// locks a hypothetical placement and [`Board::pop`] undoes it exactly, so a
/// strategy can explore a tree of placements on a single scratch board. Search
/// code must work on a [`Board::fork`], never on the live board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Placement};
///
/// let mut board = Board::new(42);
/// let before = board.clone();
///
/// // Drop the active piece straight down from spawn.
/// let mut target = board.active_piece().placement();
/// while board.is_valid_placement(target.down()) {
///     target = target.down();
/// }
///
/// let lost = board.push(target);
/// assert!(!lost);
/// board.pop();
/// assert_eq!(board, before);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    seed: u64,
    grid: Grid,
    active: Piece,
    queue: PieceQueue,
    stats: GameStats,
    generation: u64,
    lost: bool,
    history: Vec<Snapshot>,
}

impl Board {
    /// Creates an empty board whose pieces are drawn uniformly from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rule(seed, PieceRule::Uniform)
    }

    #[must_use]
    pub fn with_rule(seed: u64, rule: PieceRule) -> Self {
        let mut queue = PieceQueue::with_seed(seed, rule);
        let active = Piece::spawn(queue.pop_next());
        Self {
            seed,
            grid: Grid::new(),
            active,
            queue,
            stats: GameStats::new(),
            generation: 0,
            lost: false,
            history: vec![],
        }
    }

    /// Replaces the locked grid, e.g. to start from a prepared position.
    #[must_use]
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.lost = grid.is_topped_out();
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active
    }

    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.upcoming()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    /// Counter identifying the active piece; it increases every time a new piece spawns.
    #[must_use]
    pub fn piece_generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Number of pushes that can still be undone.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_valid(&self, piece: &Piece) -> bool {
        self.grid.is_valid(piece)
    }

    /// Checks whether the active piece's kind fits at `placement`.
    #[must_use]
    pub fn is_valid_placement(&self, placement: Placement) -> bool {
        self.grid.is_valid(&self.active.with_placement(placement))
    }

    /// Replaces the active piece if it fits.
    pub fn set_active_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.grid.is_valid(&piece) {
            return Err(PieceCollisionError);
        }
        self.active = piece;
        Ok(())
    }

    pub fn set_active_piece_unchecked(&mut self, piece: Piece) {
        self.active = piece;
    }

    /// Locks the active piece at `placement` and records an undo snapshot.
    ///
    /// The next queued piece becomes active, full rows are cleared and scored,
    /// and the return value tells whether the resulting state is a loss.
    pub fn push(&mut self, placement: Placement) -> bool {
        self.history.push(Snapshot {
            grid: self.grid.clone(),
            active: self.active,
            queue: self.queue.clone(),
            stats: self.stats.clone(),
            generation: self.generation,
            lost: self.lost,
        });
        let piece = self.active.with_placement(placement);
        self.place(&piece).lost
    }

    /// Restores the state saved by the most recent [`Board::push`].
    ///
    /// Does nothing when there is no history.
    pub fn pop(&mut self) {
        let Some(snapshot) = self.history.pop() else {
            return;
        };
        let Snapshot {
            grid,
            active,
            queue,
            stats,
            generation,
            lost,
        } = snapshot;
        self.grid = grid;
        self.active = active;
        self.queue = queue;
        self.stats = stats;
        self.generation = generation;
        self.lost = lost;
    }

    /// Deep copy of the current state with an empty undo history.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            seed: self.seed,
            grid: self.grid.clone(),
            active: self.active,
            queue: self.queue.clone(),
            stats: self.stats.clone(),
            generation: self.generation,
            lost: self.lost,
            history: vec![],
        }
    }

    /// Starts over from an empty grid with the original seed and rule.
    pub fn reset(&mut self) {
        *self = Self::with_rule(self.seed, self.queue.rule());
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(self.active.left())
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(self.active.right())
    }

    /// Rotates the active piece clockwise.
    pub fn rotate(&mut self) -> bool {
        self.try_move(self.active.rotated_right())
    }

    /// Moves the active piece one row down.
    pub fn soft_drop(&mut self) -> bool {
        self.try_move(self.active.down())
    }

    /// Locks the active piece at its live pose without recording history.
    pub fn lock_active(&mut self) -> LockOutcome {
        let piece = self.active;
        self.place(&piece)
    }

    fn try_move(&mut self, piece: Piece) -> bool {
        self.set_active_piece(piece).is_ok()
    }

    fn place(&mut self, piece: &Piece) -> LockOutcome {
        self.grid.lock(piece);
        self.active = Piece::spawn(self.queue.pop_next());
        self.generation += 1;
        let cleared_rows = self.grid.clear_rows();
        self.stats.complete_piece_drop(cleared_rows);
        self.lost = self.grid.is_topped_out();
        LockOutcome {
            cleared_rows,
            lost: self.lost,
        }
    }
}
