use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use crate::core::{Piece, PieceKind, Placement, occupancy};

use super::{
    board::{Board, LockOutcome},
    command::Command,
    game_stats::GameStats,
};

/// Interval between gravity steps when nothing else is configured.
pub const DEFAULT_FALL_INTERVAL_MS: u64 = 270;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// A running game: a [`Board`] driven by elapsed time and commands.
///
/// Each [`GameSession::tick`] applies at most one pending command and then
/// lets gravity pull the active piece down. A piece that cannot fall any
/// further locks, unless it is still at the spawn row.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    session_state: SessionState,
    pending: VecDeque<Command>,
    overlay: Vec<(usize, usize)>,
    fall_interval_ms: u64,
    fall_elapsed_ms: u64,
    total_elapsed_ms: u64,
}

impl GameSession {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_board(Board::new(seed))
    }

    #[must_use]
    pub fn with_board(board: Board) -> Self {
        let session_state = if board.is_lost() {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            board,
            session_state,
            pending: VecDeque::new(),
            overlay: vec![],
            fall_interval_ms: DEFAULT_FALL_INTERVAL_MS,
            fall_elapsed_ms: 0,
            total_elapsed_ms: 0,
        }
    }

    /// Sets the gravity interval. Zero disables gravity.
    #[must_use]
    pub fn with_fall_interval(mut self, fall_interval_ms: u64) -> Self {
        self.fall_interval_ms = fall_interval_ms;
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        self.board.stats()
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.board.score()
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.board.active_piece()
    }

    #[must_use]
    pub fn piece_generation(&self) -> u64 {
        self.board.piece_generation()
    }

    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.board.upcoming()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.total_elapsed_ms)
    }

    /// Appends a command to the pending queue; it runs on a later tick.
    pub fn enqueue_command(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Advances the session by `elapsed_ms` milliseconds.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.session_state.is_game_over() {
            return;
        }
        self.total_elapsed_ms += elapsed_ms;

        if let Some(command) = self.pending.pop_front() {
            self.apply(command);
        }

        if self.fall_interval_ms == 0 {
            return;
        }
        self.fall_elapsed_ms += elapsed_ms;
        while self.fall_elapsed_ms >= self.fall_interval_ms && self.session_state.is_playing() {
            self.fall_elapsed_ms -= self.fall_interval_ms;
            self.apply_gravity();
        }
    }

    /// Applies a command to the active piece immediately.
    ///
    /// A successful drop restarts the gravity timer. Returns `false` when the
    /// move was blocked or the game is already over.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.session_state.is_game_over() {
            return false;
        }
        match command {
            Command::Left => self.board.move_left(),
            Command::Right => self.board.move_right(),
            Command::Rotate => self.board.rotate(),
            Command::Drop => {
                let dropped = self.board.soft_drop();
                if dropped {
                    self.fall_elapsed_ms = 0;
                }
                dropped
            }
            Command::Lock => {
                self.complete_piece_drop();
                true
            }
        }
    }

    /// Moves the active piece straight to `placement` and locks it there.
    ///
    /// Returns `false` without changing anything if the piece does not fit.
    pub fn place(&mut self, placement: Placement) -> bool {
        if self.session_state.is_game_over() {
            return false;
        }
        let piece = self.board.active_piece().with_placement(placement);
        if self.board.set_active_piece(piece).is_err() {
            return false;
        }
        self.complete_piece_drop();
        true
    }

    /// Restarts with a fresh board from the same seed.
    pub fn reset(&mut self) {
        self.board.reset();
        self.session_state = SessionState::Playing;
        self.pending.clear();
        self.overlay.clear();
        self.fall_elapsed_ms = 0;
        self.total_elapsed_ms = 0;
    }

    /// Visible cells to draw, locked blocks and the active piece included.
    #[must_use]
    pub fn cells(&self) -> BTreeMap<(usize, usize), PieceKind> {
        let mut cells: BTreeMap<_, _> = self.board.grid().visible_cells().collect();
        let active = self.board.active_piece();
        cells.extend(
            active
                .occupied_cells()
                .filter_map(|(x, y)| occupancy::visible_cell(x, y))
                .map(|cell| (cell, active.kind())),
        );
        cells
    }

    /// Highlights the cells a piece would cover at `placement`, e.g. an AI's target.
    pub fn set_overlay(&mut self, kind: PieceKind, placement: Placement) {
        self.overlay = Piece::new(kind, placement)
            .occupied_cells()
            .filter_map(|(x, y)| occupancy::visible_cell(x, y))
            .collect();
    }

    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    #[must_use]
    pub fn overlay(&self) -> &[(usize, usize)] {
        &self.overlay
    }

    fn apply_gravity(&mut self) {
        if self.board.soft_drop() {
            return;
        }
        if self.board.active_piece().placement().y > 0 {
            self.complete_piece_drop();
        }
    }

    fn complete_piece_drop(&mut self) -> LockOutcome {
        let outcome = self.board.lock_active();
        self.pending.clear();
        self.overlay.clear();
        if outcome.lost {
            self.session_state = SessionState::GameOver;
            log::info!(
                "game over after {} pieces, score {}, {} rows cleared",
                self.stats().completed_pieces(),
                self.score(),
                self.stats().total_cleared_rows()
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use crate::ROWS;

    use super::*;

    fn session_with(kind: PieceKind) -> GameSession {
        let mut board = Board::new(1);
        board.set_active_piece_unchecked(Piece::spawn(kind));
        GameSession::with_board(board)
    }

    #[test]
    fn test_one_command_per_tick() {
        let mut session = session_with(PieceKind::O).with_fall_interval(0);
        session.enqueue_command(Command::Left);
        session.enqueue_command(Command::Left);
        session.tick(10);
        assert_eq!(session.active_piece().placement().x, 4);
        assert_eq!(session.pending_commands(), 1);
        session.tick(10);
        assert_eq!(session.active_piece().placement().x, 3);
        assert_eq!(session.pending_commands(), 0);
    }

    #[test]
    fn test_gravity_moves_piece_down() {
        let mut session = session_with(PieceKind::T);
        session.tick(DEFAULT_FALL_INTERVAL_MS - 1);
        assert_eq!(session.active_piece().placement().y, 0);
        session.tick(1);
        assert_eq!(session.active_piece().placement().y, 1);
        session.tick(DEFAULT_FALL_INTERVAL_MS * 3);
        assert_eq!(session.active_piece().placement().y, 4);
    }

    #[test]
    fn test_drop_restarts_gravity_timer() {
        let mut session = session_with(PieceKind::T).with_fall_interval(100);
        session.tick(90);
        assert_eq!(session.active_piece().placement().y, 0);
        session.enqueue_command(Command::Drop);
        session.tick(20);
        assert_eq!(session.active_piece().placement().y, 1);
        session.tick(79);
        assert_eq!(session.active_piece().placement().y, 1);
        session.tick(1);
        assert_eq!(session.active_piece().placement().y, 2);
    }

    #[test]
    fn test_gravity_locks_resting_piece() {
        let mut session = session_with(PieceKind::I).with_fall_interval(1);
        session.tick(ROWS as u64);
        assert_eq!(session.active_piece().placement().y, ROWS as i32);
        assert_eq!(session.piece_generation(), 0);
        session.tick(1);
        assert_eq!(session.piece_generation(), 1);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.board().grid().block_at(5, ROWS as i32 - 1), Some(PieceKind::I));
    }

    #[test]
    fn test_lock_command_and_game_over() {
        let mut session = session_with(PieceKind::O).with_fall_interval(0);
        assert!(session.apply(Command::Lock));
        assert!(session.is_lost());
        assert!(session.session_state().is_game_over());
        assert!(!session.apply(Command::Left));
        let generation = session.piece_generation();
        session.enqueue_command(Command::Lock);
        session.tick(1000);
        assert_eq!(session.piece_generation(), generation);
        assert_eq!(session.duration(), Duration::ZERO);
    }

    #[test]
    fn test_place_commits_directly() {
        let mut session = session_with(PieceKind::O);
        assert!(!session.place(Placement::new(5, ROWS as i32 + 1, 0)));
        assert_eq!(session.piece_generation(), 0);
        assert!(session.place(Placement::new(1, ROWS as i32, 0)));
        assert_eq!(session.piece_generation(), 1);
        assert!(session.cells().contains_key(&(0, ROWS - 1)));
        assert!(!session.is_lost());
    }

    #[test]
    fn test_overlay_tracks_target() {
        let mut session = session_with(PieceKind::O);
        session.set_overlay(PieceKind::O, Placement::new(1, ROWS as i32, 0));
        assert_eq!(session.overlay().len(), 4);
        session.place(Placement::new(9, ROWS as i32, 0));
        assert!(session.overlay().is_empty());

        session.set_overlay(PieceKind::O, Placement::new(1, ROWS as i32, 0));
        session.clear_overlay();
        assert!(session.overlay().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut session = session_with(PieceKind::O);
        session.apply(Command::Lock);
        assert!(session.is_lost());
        session.reset();
        assert!(session.session_state().is_playing());
        assert_eq!(session.board(), &Board::new(1));
    }
}
