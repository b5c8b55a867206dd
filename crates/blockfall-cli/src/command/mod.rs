use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flexi_logger::{AdaptiveFormat, Logger};

use self::{auto_play::AutoPlayArg, bench::BenchArg, duel::DuelArg};

mod ai_arg;
mod auto_play;
mod bench;
mod duel;
mod game;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter, e.g. `debug` or `blockfall_ai=debug` (`RUST_LOG` takes precedence)
    #[clap(long, global = true, default_value = "info")]
    log_level: String,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one game with an AI player and print the final board
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Let two AI players race on the same piece sequence
    Duel(#[clap(flatten)] DuelArg),
    /// Compare strategies over several seeds
    Bench(#[clap(flatten)] BenchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let _logger = Logger::try_with_env_or_str(&args.log_level)
        .context("Invalid log level")?
        .log_to_stderr()
        .adaptive_format_for_stderr(AdaptiveFormat::Default)
        .start()
        .context("Failed to start logger")?;

    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Duel(arg) => duel::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
    }
    Ok(())
}
