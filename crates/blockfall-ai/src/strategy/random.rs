use blockfall_engine::{Board, Placement};
use rand::{SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use super::Strategy;

/// Picks any reachable placement with equal probability.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: Pcg32,
}

impl RandomStrategy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide_among(&mut self, _board: &Board, candidates: &[Placement]) -> Option<Placement> {
        candidates.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::reachability;

    #[test]
    fn test_picks_reachable_placements() {
        let board = Board::new(2);
        let placements = reachability::enumerate(&board);
        let mut strategy = RandomStrategy::new(10);
        let picked: BTreeSet<_> = (0..50)
            .map(|_| strategy.decide(&board).unwrap())
            .collect();
        assert!(picked.iter().all(|p| placements.contains(p)));
        assert!(picked.len() > 1);
    }
}
