use std::iter;

use blockfall_engine::{Board, COLS, Occupancy, ROWS};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Coefficients of the board evaluation.
///
/// The score term is a reward; the other four are penalties, so every weight
/// is expected to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub score: f32,
    pub height: f32,
    pub holes: f32,
    pub bumpiness: f32,
    pub wells: f32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl HeuristicWeights {
    /// Strongly avoids holes.
    pub const CLASSIC: Self = Self {
        score: 6.0,
        height: 1.0,
        holes: 25.0,
        bumpiness: 2.0,
        wells: 1.0,
    };

    /// Chases row clears and tolerates holes.
    pub const AGGRO: Self = Self {
        score: 10.0,
        height: 1.0,
        holes: 5.0,
        bumpiness: 1.0,
        wells: 1.0,
    };

    #[must_use]
    pub fn from_preset(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::Classic => Self::CLASSIC,
            WeightPreset::Aggro => Self::AGGRO,
        }
    }

    fn named(&self) -> [(&'static str, f32); 5] {
        [
            ("score", self.score),
            ("height", self.height),
            ("holes", self.holes),
            ("bumpiness", self.bumpiness),
            ("wells", self.wells),
        ]
    }

    /// Checks that every weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum WeightPreset {
    #[default]
    Classic,
    Aggro,
}

/// Raw surface features of the locked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMetrics {
    pub column_heights: [usize; COLS],
    pub aggregate_height: usize,
    pub holes: usize,
    pub bumpiness: usize,
    pub well_sum: usize,
}

impl BoardMetrics {
    #[must_use]
    pub fn measure(occupancy: &Occupancy) -> Self {
        let column_heights = occupancy.column_heights();
        Self {
            column_heights,
            aggregate_height: column_heights.iter().sum(),
            holes: count_holes(occupancy, &column_heights),
            bumpiness: column_heights
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum(),
            well_sum: well_depths(&column_heights).iter().sum(),
        }
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.column_heights.iter().copied().max().unwrap_or(0)
    }
}

/// Empty cells with an occupied cell somewhere above them in the same column.
fn count_holes(occupancy: &Occupancy, column_heights: &[usize; COLS]) -> usize {
    iter::zip(0..COLS, column_heights)
        .map(|(x, &height)| {
            (ROWS - height..ROWS)
                .filter(|&y| !occupancy.is_occupied(x, y))
                .count()
        })
        .sum()
}

/// Depth of every column that is lower than both neighbors.
///
/// The walls count as infinitely tall, so an edge column is a well exactly
/// when its single neighbor is taller.
fn well_depths(h: &[usize; COLS]) -> [usize; COLS] {
    let start = [usize::MAX, h[0], h[1]];
    let end = [h[COLS - 2], h[COLS - 1], usize::MAX];
    let triples = iter::once(&start[..])
        .chain(h.windows(3))
        .chain(iter::once(&end[..]));
    let mut depths = [0; COLS];
    for (w, depth) in iter::zip(triples, &mut depths) {
        if w[1] < w[0] && w[1] < w[2] {
            *depth = usize::min(w[0], w[2]) - w[1];
        }
    }
    depths
}

/// Scores a board position; higher is better.
///
/// The result depends only on the locked cells and the accumulated score, so
/// evaluating the same board twice gives the same value.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn evaluate(board: &Board, weights: &HeuristicWeights) -> f32 {
    let metrics = BoardMetrics::measure(board.grid().accepted());
    weights.score * board.score() as f32
        - weights.height * metrics.aggregate_height as f32
        - weights.holes * metrics.holes as f32
        - weights.bumpiness * metrics.bumpiness as f32
        - weights.wells * metrics.well_sum as f32
}
