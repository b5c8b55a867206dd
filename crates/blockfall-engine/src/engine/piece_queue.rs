use std::collections::VecDeque;

use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// Number of upcoming pieces visible in the lookahead queue.
pub const LOOKAHEAD: usize = 5;

/// How upcoming piece kinds are drawn.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum PieceRule {
    /// Every draw picks one of the 7 kinds uniformly at random.
    #[default]
    Uniform,
    /// 7-bag: all 7 kinds are shuffled and dealt before the next bag is opened.
    Bag,
}

/// Seeded piece source with a fixed-length lookahead queue.
///
/// Using the same seed and rule produces the same sequence of pieces, which
/// is what makes replays and tests deterministic. The whole generator state is
/// a plain value, so cloning it forks the future piece sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceQueue, PieceRule};
///
/// let mut a = PieceQueue::with_seed(7, PieceRule::Uniform);
/// let mut b = PieceQueue::with_seed(7, PieceRule::Uniform);
/// assert_eq!(a.pop_next(), b.pop_next());
/// assert_eq!(a.upcoming().count(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    rng: Pcg32,
    rule: PieceRule,
    bag: Vec<PieceKind>,
    upcoming: VecDeque<PieceKind>,
}

impl PieceQueue {
    /// Creates a queue and fills the lookahead from the given seed.
    #[must_use]
    pub fn with_seed(seed: u64, rule: PieceRule) -> Self {
        let mut this = Self {
            rng: Pcg32::seed_from_u64(seed),
            rule,
            bag: Vec::with_capacity(PieceKind::LEN),
            upcoming: VecDeque::with_capacity(LOOKAHEAD + 1),
        };
        this.refill();
        this
    }

    #[must_use]
    pub fn rule(&self) -> PieceRule {
        self.rule
    }

    /// Takes the front of the lookahead queue and tops the queue back up.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty (should never happen with proper refill logic).
    pub fn pop_next(&mut self) -> PieceKind {
        self.refill();
        let next = self
            .upcoming
            .pop_front()
            .expect("lookahead queue should never be empty");
        self.refill();
        next
    }

    /// Returns an iterator over the upcoming kinds, nearest first.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.upcoming.iter().copied()
    }

    fn refill(&mut self) {
        while self.upcoming.len() < LOOKAHEAD {
            let kind = self.draw();
            self.upcoming.push_back(kind);
        }
    }

    fn draw(&mut self) -> PieceKind {
        match self.rule {
            PieceRule::Uniform => self.rng.random(),
            PieceRule::Bag => {
                if self.bag.is_empty() {
                    self.bag.extend(PieceKind::ALL);
                    self.bag.shuffle(&mut self.rng);
                }
                self.bag.pop().expect("bag was just refilled")
            }
        }
    }
}
