use std::{cmp::Ordering, iter};

use blockfall_ai::Difficulty;
use blockfall_engine::PieceRule;

use crate::util;

use super::game::{Game, Pace};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DuelArg {
    /// Difficulty of the left player
    #[clap(long, default_value = "easy")]
    left: Difficulty,
    /// Difficulty of the right player
    #[clap(long, default_value = "monte-carlo")]
    right: Difficulty,
    /// Seed of the piece sequence both players receive
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Stop after this many pieces per player
    #[clap(long, default_value_t = 200)]
    max_pieces: usize,
    /// Simulated milliseconds per tick
    #[clap(long, default_value_t = 10)]
    tick_ms: u64,
}

pub(crate) fn run(arg: &DuelArg) -> anyhow::Result<()> {
    let DuelArg {
        left,
        right,
        seed,
        max_pieces,
        tick_ms,
    } = arg;
    anyhow::ensure!(*tick_ms > 0, "--tick-ms must be positive");

    let new_game = |difficulty: Difficulty| {
        Game::new(
            &difficulty.config(),
            *seed,
            PieceRule::Uniform,
            Pace::Ticks(*tick_ms),
            *max_pieces,
        )
    };
    let mut games = [new_game(*left)?, new_game(*right)?];

    while games.iter().any(|game| !game.is_finished()) {
        for game in &mut games {
            game.advance();
        }
    }

    let [left_game, right_game] = &games;
    let left_lines = util::board_lines(left_game.session());
    let right_lines = util::board_lines(right_game.session());
    println!("{:<22}  {right}", left.to_string());
    for (l, r) in iter::zip(left_lines, right_lines) {
        println!("{l:<22}  {r}");
    }
    println!();
    for (difficulty, game) in [(left, left_game), (right, right_game)] {
        util::print_summary(&format!("{difficulty} ({})", game.strategy_name()), game.session());
    }

    let (left_score, right_score) = (left_game.session().score(), right_game.session().score());
    match left_score.cmp(&right_score) {
        Ordering::Greater => println!("winner: {left}"),
        Ordering::Less => println!("winner: {right}"),
        Ordering::Equal => println!("draw"),
    }
    Ok(())
}
