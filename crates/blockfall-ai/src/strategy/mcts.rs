use blockfall_engine::{Board, Placement};
use rand::{SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{
    heuristic::{self, HeuristicWeights},
    reachability,
};

use super::Strategy;

/// Reward added for every placement a rollout survives.
const MOVE_BONUS: f64 = 1.0;
/// Reward of a rollout that loses or runs out of placements.
const LOSS_PENALTY: f64 = -10_000.0;
const EXPLORATION: f64 = 2.0;
const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node {
    placement: Placement,
    parent: Option<usize>,
    children: Vec<usize>,
    expanded: bool,
    total_score: f64,
    visits: u32,
}

impl Node {
    fn new(placement: Placement, parent: Option<usize>) -> Self {
        Self {
            placement,
            parent,
            children: vec![],
            expanded: false,
            total_score: 0.0,
            visits: 0,
        }
    }

    fn mean(&self) -> f64 {
        self.total_score / f64::from(self.visits)
    }
}

/// Search tree stored as an arena; nodes refer to each other by index.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn new(root: Placement) -> Self {
        Self {
            nodes: vec![Node::new(root, None)],
        }
    }

    fn expand(&mut self, node: usize, placements: Vec<Placement>) {
        for placement in placements {
            let child = self.nodes.len();
            self.nodes.push(Node::new(placement, Some(node)));
            self.nodes[node].children.push(child);
        }
        self.nodes[node].expanded = true;
    }

    /// Child with the highest UCT value; unvisited children come first.
    fn select_child(&self, node: usize) -> Option<usize> {
        let parent_visits = f64::from(self.nodes[node].visits.max(1));
        let uct = |child: usize| {
            let child = &self.nodes[child];
            if child.visits == 0 {
                return f64::INFINITY;
            }
            let visits = f64::from(child.visits);
            child.mean() + EXPLORATION * (2.0 * parent_visits.ln() / visits).sqrt()
        };
        let mut best: Option<(usize, f64)> = None;
        for &child in &self.nodes[node].children {
            let value = uct(child);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((child, value));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Adds a rollout result to `node` and every ancestor up to the root.
    fn backpropagate(&mut self, node: usize, reward: f64) {
        let mut current = Some(node);
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            node.visits += 1;
            node.total_score += reward;
            current = node.parent;
        }
    }
}

/// Monte Carlo tree search with UCT selection.
///
/// Each simulation descends the tree, expands the reached node with every
/// placement available there, plays a short random game from it, and feeds the
/// result back to the root. The most rewarding root placement is chosen.
#[derive(Debug, Clone)]
pub struct MctsStrategy {
    simulations: usize,
    rollout_depth: usize,
    weights: HeuristicWeights,
    rng: Pcg32,
}

impl MctsStrategy {
    #[must_use]
    pub fn new(
        simulations: usize,
        rollout_depth: usize,
        weights: HeuristicWeights,
        seed: u64,
    ) -> Self {
        Self {
            simulations,
            rollout_depth,
            weights,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn search(&mut self, board: &Board, candidates: &[Placement]) -> Option<Tree> {
        if candidates.is_empty() {
            return None;
        }
        let mut scratch = board.fork();
        let mut tree = Tree::new(board.active_piece().placement());
        tree.expand(ROOT, candidates.to_vec());

        for _ in 0..self.simulations {
            let mut node = ROOT;
            let mut pushed = 0;
            while !scratch.is_lost() {
                if !tree.nodes[node].expanded {
                    tree.expand(node, reachability::enumerate(&scratch));
                }
                let Some(child) = tree.select_child(node) else {
                    break;
                };
                scratch.push(tree.nodes[child].placement);
                pushed += 1;
                node = child;
                if tree.nodes[child].visits == 0 {
                    break;
                }
            }
            let reward = self.rollout(&mut scratch);
            tree.backpropagate(node, reward);
            for _ in 0..pushed {
                scratch.pop();
            }
        }
        Some(tree)
    }

    /// Plays random placements from the current state and scores the outcome.
    ///
    /// The board is restored before returning.
    fn rollout(&mut self, board: &mut Board) -> f64 {
        let mut pushed = 0;
        let reward = loop {
            if board.is_lost() {
                break LOSS_PENALTY;
            }
            if pushed == self.rollout_depth {
                let score = f64::from(heuristic::evaluate(board, &self.weights));
                #[expect(clippy::cast_precision_loss)]
                let bonus = MOVE_BONUS * pushed as f64;
                break score + bonus;
            }
            let placements = reachability::enumerate(board);
            let Some(&placement) = placements.choose(&mut self.rng) else {
                break LOSS_PENALTY;
            };
            board.push(placement);
            pushed += 1;
        };
        for _ in 0..pushed {
            board.pop();
        }
        reward
    }

    #[expect(clippy::float_cmp)]
    fn choose(&mut self, tree: &Tree) -> Option<Placement> {
        let root = &tree.nodes[ROOT];
        let visited: Vec<&Node> = root
            .children
            .iter()
            .map(|&child| &tree.nodes[child])
            .filter(|child| child.visits > 0)
            .collect();
        let Some(best_mean) = visited.iter().map(|child| child.mean()).reduce(f64::max) else {
            let first = root.children.first()?;
            return Some(tree.nodes[*first].placement);
        };
        let candidates: Vec<&Node> = visited
            .into_iter()
            .filter(|child| child.mean() == best_mean)
            .collect();
        candidates
            .choose(&mut self.rng)
            .map(|child| child.placement)
    }
}

impl Strategy for MctsStrategy {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn decide_among(&mut self, board: &Board, candidates: &[Placement]) -> Option<Placement> {
        let tree = self.search(board, candidates)?;
        let placement = self.choose(&tree)?;
        log::debug!(
            "mcts picked {placement:?} after {} simulations over {} nodes",
            tree.nodes[ROOT].visits,
            tree.nodes.len()
        );
        Some(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(simulations: usize, seed: u64) -> MctsStrategy {
        MctsStrategy::new(simulations, 2, HeuristicWeights::CLASSIC, seed)
    }

    #[test]
    fn test_zero_simulations_returns_first_child() {
        let board = Board::new(6);
        let first = reachability::enumerate(&board)[0];
        assert_eq!(strategy(0, 1).decide(&board), Some(first));
    }

    #[test]
    fn test_backpropagation_reaches_root() {
        let board = Board::new(6);
        let mut mcts = strategy(40, 1);
        let tree = mcts
            .search(&board, &reachability::enumerate(&board))
            .unwrap();
        let root = &tree.nodes[ROOT];
        assert_eq!(root.visits, 40);
        let child_visits: u32 = root.children.iter().map(|&c| tree.nodes[c].visits).sum();
        assert_eq!(child_visits, 40);
        // Every non-root node has been counted by its parent as well.
        for node in &tree.nodes[1..] {
            let parent = &tree.nodes[node.parent.unwrap()];
            assert!(parent.visits >= node.visits);
        }
    }

    #[test]
    fn test_decision_is_reachable_and_board_untouched() {
        let board = Board::new(8);
        let before = board.clone();
        let placement = strategy(10, 3).decide(&board).unwrap();
        assert_eq!(board, before);
        assert!(reachability::enumerate(&board).contains(&placement));
    }

    #[test]
    fn test_same_seed_same_choice() {
        let board = Board::new(8);
        assert_eq!(strategy(10, 5).decide(&board), strategy(10, 5).decide(&board));
    }

    #[test]
    fn test_uct_prefers_unvisited() {
        let mut tree = Tree::new(Placement::SPAWN);
        tree.expand(
            ROOT,
            vec![Placement::new(1, 20, 0), Placement::new(2, 20, 0)],
        );
        tree.backpropagate(1, 100.0);
        assert_eq!(tree.select_child(ROOT), Some(2));
        tree.backpropagate(2, -5.0);
        assert_eq!(tree.select_child(ROOT), Some(1));
    }
}
