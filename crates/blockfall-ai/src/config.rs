use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    heuristic::HeuristicWeights,
    strategy::{GreedyStrategy, MctsStrategy, MinimaxStrategy, RandomStrategy, Strategy},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("search depth must be at least 1")]
    ZeroDepth,
    #[display("rollout depth must be at least 1")]
    ZeroRolloutDepth,
    #[display("command interval must be positive")]
    ZeroCommandInterval,
    #[display("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },
}

#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Depth-limited exhaustive search.
    #[default]
    #[display("greedy")]
    Greedy,
    /// Depth-limited search with alpha-beta bounds.
    #[display("minimax")]
    Minimax,
    /// Monte Carlo tree search with UCT selection.
    #[display("mcts")]
    Mcts,
    /// Uniformly random placement.
    #[display("random")]
    Random,
}

/// Settings of an AI player.
///
/// Deserializes from JSON; missing fields take their [`Default`] values.
///
/// ```
/// use blockfall_ai::{AiConfig, StrategyKind};
///
/// let config: AiConfig = serde_json::from_str(r#"{ "strategy": "minimax", "depth": 2 }"#).unwrap();
/// assert_eq!(config.strategy, StrategyKind::Minimax);
/// assert_eq!(config.depth, 2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub strategy: StrategyKind,
    /// Plies searched, counting the placement being chosen.
    pub depth: usize,
    /// Simulations per decision (MCTS only).
    pub simulations: usize,
    /// Random placements per rollout (MCTS only).
    pub rollout_depth: usize,
    /// Delay between two commands sent to the live piece.
    pub command_interval_ms: u64,
    pub weights: HeuristicWeights,
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Greedy,
            depth: 1,
            simulations: 50,
            rollout_depth: 20,
            command_interval_ms: 150,
            weights: HeuristicWeights::CLASSIC,
            seed: 0,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.rollout_depth == 0 {
            return Err(ConfigError::ZeroRolloutDepth);
        }
        if self.command_interval_ms == 0 {
            return Err(ConfigError::ZeroCommandInterval);
        }
        self.weights.validate()
    }

    /// Validates the configuration and instantiates its strategy.
    pub fn build_strategy(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        self.validate()?;
        let strategy: Box<dyn Strategy> = match self.strategy {
            StrategyKind::Greedy => Box::new(GreedyStrategy::new(self.depth, self.weights)),
            StrategyKind::Minimax => Box::new(MinimaxStrategy::new(self.depth, self.weights)),
            StrategyKind::Mcts => Box::new(MctsStrategy::new(
                self.simulations,
                self.rollout_depth,
                self.weights,
                self.seed,
            )),
            StrategyKind::Random => Box::new(RandomStrategy::new(self.seed)),
        };
        Ok(strategy)
    }
}

/// Ready-made player settings, from a relaxed opponent to a fast lookahead searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Difficulty {
    #[display("easy")]
    Easy,
    #[display("advanced")]
    Advanced,
    #[display("nightmare")]
    Nightmare,
    #[display("monte-carlo")]
    MonteCarlo,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty `{_0}` (expected easy, advanced, nightmare or monte-carlo)")]
pub struct ParseDifficultyError(#[error(not(source))] String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "advanced" => Ok(Self::Advanced),
            "nightmare" => Ok(Self::Nightmare),
            "monte-carlo" | "montecarlo" => Ok(Self::MonteCarlo),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

impl Difficulty {
    #[must_use]
    pub fn config(self) -> AiConfig {
        let base = AiConfig::default();
        match self {
            Difficulty::Easy => AiConfig {
                depth: 1,
                command_interval_ms: 350,
                ..base
            },
            Difficulty::Advanced => AiConfig {
                depth: 2,
                command_interval_ms: 150,
                ..base
            },
            Difficulty::Nightmare => AiConfig {
                depth: 2,
                command_interval_ms: 100,
                ..base
            },
            Difficulty::MonteCarlo => AiConfig {
                strategy: StrategyKind::Mcts,
                simulations: 50,
                command_interval_ms: 150,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let config = AiConfig {
            depth: 0,
            ..AiConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDepth));
        assert!(config.build_strategy().is_err());

        let config = AiConfig {
            command_interval_ms: 0,
            ..AiConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCommandInterval));

        let config = AiConfig {
            weights: HeuristicWeights {
                height: f32::INFINITY,
                ..HeuristicWeights::CLASSIC
            },
            ..AiConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("`height`"));
    }

    #[test]
    fn test_json_config() {
        let json = r#"{
            "strategy": "mcts",
            "simulations": 12,
            "weights": { "score": 1.0, "height": 2.0, "holes": 3.0, "bumpiness": 4.0, "wells": 5.0 },
            "seed": 99
        }"#;
        let config: AiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.strategy, StrategyKind::Mcts);
        assert_eq!(config.simulations, 12);
        assert_eq!(config.depth, 1);
        assert!((config.weights.wells - 5.0).abs() < f32::EPSILON);
        let strategy = config.build_strategy().unwrap();
        assert_eq!(strategy.name(), "mcts");
    }

    #[test]
    fn test_difficulty_presets() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(
            "monte-carlo".parse::<Difficulty>().unwrap(),
            Difficulty::MonteCarlo
        );
        assert!("impossible".parse::<Difficulty>().is_err());

        let easy = Difficulty::Easy.config();
        assert_eq!((easy.depth, easy.command_interval_ms), (1, 350));
        let nightmare = Difficulty::Nightmare.config();
        assert_eq!((nightmare.depth, nightmare.command_interval_ms), (2, 100));
        let mc = Difficulty::MonteCarlo.config();
        assert_eq!(mc.strategy, StrategyKind::Mcts);
        assert_eq!(mc.simulations, 50);
        for difficulty in [
            Difficulty::Easy,
            Difficulty::Advanced,
            Difficulty::Nightmare,
            Difficulty::MonteCarlo,
        ] {
            assert!(difficulty.config().validate().is_ok(), "{difficulty}");
        }
    }

    #[test]
    fn test_strategy_kind_names() {
        assert_eq!("MCTS".parse::<StrategyKind>().unwrap(), StrategyKind::Mcts);
        assert_eq!(StrategyKind::Random.to_string(), "random");
    }
}
