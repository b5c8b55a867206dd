use blockfall_engine::{Board, Placement};

use crate::{
    heuristic::{self, HeuristicWeights},
    reachability,
};

use super::Strategy;

/// Exhaustive depth-limited search over placements.
///
/// Every placement of the active piece is tried, followed by every placement
/// of the next `depth - 1` queued pieces. A line of play is worth its best
/// leaf, and the root placement with the best line wins. Ties keep the
/// placement found first.
#[derive(Debug, Clone)]
pub struct GreedyStrategy {
    depth: usize,
    weights: HeuristicWeights,
}

impl GreedyStrategy {
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn new(depth: usize, weights: HeuristicWeights) -> Self {
        assert!(depth > 0, "search depth must be at least 1");
        Self { depth, weights }
    }

    fn best_leaf(&self, board: &mut Board, remaining: usize) -> f32 {
        if remaining == 0 || board.is_lost() {
            return heuristic::evaluate(board, &self.weights);
        }
        let placements = reachability::enumerate(board);
        if placements.is_empty() {
            return heuristic::evaluate(board, &self.weights);
        }
        let mut best = f32::NEG_INFINITY;
        for placement in placements {
            board.push(placement);
            best = best.max(self.best_leaf(board, remaining - 1));
            board.pop();
        }
        best
    }
}

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn decide_among(&mut self, board: &Board, candidates: &[Placement]) -> Option<Placement> {
        let mut scratch = board.fork();
        let mut best: Option<(Placement, f32)> = None;
        for &placement in candidates {
            scratch.push(placement);
            let value = self.best_leaf(&mut scratch, self.depth - 1);
            scratch.pop();
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((placement, value));
            }
        }
        let (placement, value) = best?;
        log::debug!("greedy picked {placement:?} worth {value}");
        Some(placement)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Grid, Piece, PieceKind, ROWS};

    use super::*;

    fn board_with(kind: PieceKind, art: &str) -> Board {
        let mut board = Board::new(3).with_grid(Grid::from_ascii(art));
        board.set_active_piece_unchecked(Piece::spawn(kind));
        board
    }

    #[test]
    fn test_completes_row() {
        let board = board_with(
            PieceKind::I,
            "
            ####.#####
            ####.#####
            ####.#####
            ####.#####
            ",
        );
        let mut strategy = GreedyStrategy::new(1, HeuristicWeights::CLASSIC);
        let placement = strategy.decide(&board).unwrap();
        assert_eq!(placement, Placement::new(4, ROWS as i32, 0));
    }

    #[test]
    fn test_does_not_touch_board() {
        let board = Board::new(9);
        let before = board.clone();
        let mut strategy = GreedyStrategy::new(2, HeuristicWeights::AGGRO);
        let placement = strategy.decide(&board).unwrap();
        assert_eq!(board, before);
        assert!(reachability::enumerate(&board).contains(&placement));
    }

    #[test]
    fn test_deterministic() {
        let board = Board::new(4);
        let a = GreedyStrategy::new(1, HeuristicWeights::CLASSIC).decide(&board);
        let b = GreedyStrategy::new(1, HeuristicWeights::CLASSIC).decide(&board);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_placement() {
        let mut board = Board::new(4);
        let piece = board.active_piece();
        board.set_active_piece_unchecked(piece.with_placement(Placement::new(-2, 0, 0)));
        let mut strategy = GreedyStrategy::new(1, HeuristicWeights::CLASSIC);
        assert_eq!(strategy.decide(&board), None);
    }
}
