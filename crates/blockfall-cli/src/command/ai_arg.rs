use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_ai::{
    AiConfig, Difficulty, StrategyKind,
    heuristic::{HeuristicWeights, WeightPreset},
};

use crate::util;

/// AI settings shared by the subcommands.
///
/// A JSON config file, if given, is the starting point; otherwise a difficulty
/// preset or the defaults are. Individual flags override either.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AiArg {
    /// AI config file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Difficulty preset: easy, advanced, nightmare or monte-carlo
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Search strategy: greedy, minimax, mcts or random
    #[clap(long)]
    strategy: Option<StrategyKind>,
    /// Search depth in plies, counting the placement being chosen
    #[clap(long)]
    depth: Option<usize>,
    /// MCTS simulations per decision
    #[clap(long)]
    simulations: Option<usize>,
    /// Heuristic weight preset: classic or aggro
    #[clap(long)]
    weights: Option<WeightPreset>,
    /// Seed of the AI's own random choices
    #[clap(long)]
    ai_seed: Option<u64>,
}

impl AiArg {
    pub(crate) fn to_config(&self) -> anyhow::Result<AiConfig> {
        let mut config = match (&self.config, self.difficulty) {
            (Some(path), _) => util::read_json_file("AI config", path)?,
            (None, Some(difficulty)) => difficulty.config(),
            (None, None) => AiConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(simulations) = self.simulations {
            config.simulations = simulations;
        }
        if let Some(preset) = self.weights {
            config.weights = HeuristicWeights::from_preset(preset);
        }
        if let Some(seed) = self.ai_seed {
            config.seed = seed;
        }
        config.validate().context("Invalid AI configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Args {
        #[clap(flatten)]
        ai: AiArg,
    }

    fn parse(args: &[&str]) -> AiConfig {
        let args = Args::try_parse_from(iter_args(args)).unwrap();
        args.ai.to_config().unwrap()
    }

    fn iter_args<'a>(args: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
        std::iter::once("blockfall").chain(args.iter().copied())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), AiConfig::default());
    }

    #[test]
    fn test_flags_override_preset() {
        let config = parse(&["--difficulty", "nightmare", "--strategy", "minimax", "--weights", "aggro"]);
        assert_eq!(config.strategy, StrategyKind::Minimax);
        assert_eq!(config.depth, 2);
        assert_eq!(config.command_interval_ms, 100);
        assert_eq!(config.weights, HeuristicWeights::AGGRO);
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        let args = Args::try_parse_from(iter_args(&["--depth", "0"])).unwrap();
        let err = args.ai.to_config().unwrap_err();
        assert!(format!("{err:#}").contains("at least 1"));
    }
}
