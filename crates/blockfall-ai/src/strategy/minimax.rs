use blockfall_engine::{Board, Placement};

use crate::{
    heuristic::{self, HeuristicWeights},
    reachability,
};

use super::Strategy;

/// Depth-limited search with alpha-beta bounds.
///
/// There is no opponent, so every ply maximizes. The upper bound therefore
/// never drops below `+inf` and cutoffs only happen when a caller passes a
/// finite `beta` to [`MinimaxStrategy::value`].
#[derive(Debug, Clone)]
pub struct MinimaxStrategy {
    depth: usize,
    weights: HeuristicWeights,
}

impl MinimaxStrategy {
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn new(depth: usize, weights: HeuristicWeights) -> Self {
        assert!(depth > 0, "search depth must be at least 1");
        Self { depth, weights }
    }

    /// Value of `board` searched `depth` more plies, within `[alpha, beta]`.
    ///
    /// At depth 0, on a lost board, or when no placement is left, this is the
    /// heuristic score itself. The board is used as scratch space and is
    /// restored before returning.
    pub fn value(&self, board: &mut Board, depth: usize, mut alpha: f32, beta: f32) -> f32 {
        if depth == 0 || board.is_lost() {
            return heuristic::evaluate(board, &self.weights);
        }
        let placements = reachability::enumerate(board);
        if placements.is_empty() {
            return heuristic::evaluate(board, &self.weights);
        }
        let mut best = f32::NEG_INFINITY;
        for placement in placements {
            board.push(placement);
            let value = self.value(board, depth - 1, alpha, beta);
            board.pop();
            best = best.max(value);
            alpha = alpha.max(best);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

impl Strategy for MinimaxStrategy {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn decide_among(&mut self, board: &Board, candidates: &[Placement]) -> Option<Placement> {
        let mut scratch = board.fork();
        let mut alpha = f32::NEG_INFINITY;
        let mut best = None;
        for &placement in candidates {
            scratch.push(placement);
            let value = self.value(&mut scratch, self.depth - 1, alpha, f32::INFINITY);
            scratch.pop();
            if best.is_none() || value > alpha {
                alpha = alpha.max(value);
                best = Some(placement);
            }
        }
        log::debug!("minimax picked {best:?} worth {alpha}");
        best
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Grid, Piece, PieceKind};

    use super::*;
    use crate::strategy::GreedyStrategy;

    #[test]
    fn test_depth_zero_is_evaluation() {
        let mut board = Board::new(12).with_grid(Grid::from_ascii(
            "
            #..#......
            ##.##..#.#
            ",
        ));
        let strategy = MinimaxStrategy::new(1, HeuristicWeights::CLASSIC);
        let expected = heuristic::evaluate(&board, &HeuristicWeights::CLASSIC);
        let value = strategy.value(&mut board, 0, f32::NEG_INFINITY, f32::INFINITY);
        assert!((value - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_value_restores_board() {
        let mut board = Board::new(12);
        let before = board.clone();
        let strategy = MinimaxStrategy::new(1, HeuristicWeights::CLASSIC);
        let _ = strategy.value(&mut board, 2, f32::NEG_INFINITY, f32::INFINITY);
        assert_eq!(board, before);
    }

    #[test]
    fn test_finite_beta_cuts_off() {
        let mut board = Board::new(12);
        let strategy = MinimaxStrategy::new(1, HeuristicWeights::CLASSIC);
        let full = strategy.value(&mut board, 1, f32::NEG_INFINITY, f32::INFINITY);
        // Any beta below the true value stops at the first child that reaches it.
        let cut = strategy.value(&mut board, 1, f32::NEG_INFINITY, f32::NEG_INFINITY);
        assert!(cut <= full);
    }

    #[test]
    fn test_agrees_with_greedy() {
        for seed in 0..4 {
            let mut board = Board::new(seed);
            board.set_active_piece_unchecked(Piece::spawn(PieceKind::ALL[seed as usize]));
            let mut minimax = MinimaxStrategy::new(2, HeuristicWeights::CLASSIC);
            let mut greedy = GreedyStrategy::new(2, HeuristicWeights::CLASSIC);
            assert_eq!(minimax.decide(&board), greedy.decide(&board), "seed {seed}");
        }
    }
}
