//! Placement search strategies.
//!
//! Every strategy looks at a [`Board`], searches on a private fork of it, and
//! picks the placement it wants the active piece to end up at. The live board
//! is never modified.

use std::fmt;

use blockfall_engine::{Board, Placement};

use crate::reachability;

pub use self::{greedy::*, mcts::*, minimax::*, random::*};

mod greedy;
mod mcts;
mod minimax;
mod random;

pub trait Strategy: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Chooses a resting placement for the active piece.
    ///
    /// Returns `None` when the piece has nowhere to go.
    fn decide(&mut self, board: &Board) -> Option<Placement> {
        self.decide_among(board, &reachability::enumerate(board))
    }

    /// Chooses one of `candidates` for the active piece.
    ///
    /// Only the first ply is restricted; deeper plies still search every
    /// reachable placement. Returns `None` when `candidates` is empty.
    fn decide_among(&mut self, board: &Board, candidates: &[Placement]) -> Option<Placement>;
}
