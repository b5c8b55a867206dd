use blockfall_engine::PieceRule;

use crate::util;

use super::{
    ai_arg::AiArg,
    game::{Game, Pace},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    ai: AiArg,
    /// Seed of the piece sequence
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// How upcoming pieces are drawn: uniform or bag
    #[clap(long, default_value = "uniform")]
    piece_rule: PieceRule,
    /// Stop after this many pieces
    #[clap(long, default_value_t = 500)]
    max_pieces: usize,
    /// Move pieces with paced commands under gravity instead of placing them directly
    #[clap(long)]
    paced: bool,
    /// Simulated milliseconds per tick in paced mode
    #[clap(long, default_value_t = 10)]
    tick_ms: u64,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        ai,
        seed,
        piece_rule,
        max_pieces,
        paced,
        tick_ms,
    } = arg;

    let config = ai.to_config()?;
    let pace = if *paced {
        anyhow::ensure!(*tick_ms > 0, "--tick-ms must be positive");
        Pace::Ticks(*tick_ms)
    } else {
        Pace::Direct
    };
    log::info!(
        "playing seed {seed} with {} (depth {}, {} ms per command)",
        config.strategy,
        config.depth,
        config.command_interval_ms
    );

    let mut game = Game::new(&config, *seed, *piece_rule, pace, *max_pieces)?;
    game.play_to_end();

    let session = game.session();
    util::print_board(session);
    println!();
    util::print_summary(game.strategy_name(), session);
    Ok(())
}
