use blockfall_ai::StrategyKind;
use blockfall_engine::PieceRule;

use super::{
    ai_arg::AiArg,
    game::{Game, Pace},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    #[clap(flatten)]
    ai: AiArg,
    /// Strategies to compare
    #[clap(
        long,
        value_delimiter = ',',
        default_value = "greedy,minimax,mcts,random"
    )]
    strategies: Vec<StrategyKind>,
    /// Number of games per strategy
    #[clap(long, default_value_t = 5)]
    games: u64,
    /// Seed of the first game; game `i` uses `seed + i`
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Stop each game after this many pieces
    #[clap(long, default_value_t = 200)]
    max_pieces: usize,
    /// How upcoming pieces are drawn: uniform or bag
    #[clap(long, default_value = "uniform")]
    piece_rule: PieceRule,
}

#[derive(Debug, Default)]
struct BenchRow {
    games: u64,
    losses: u64,
    total_score: u64,
    total_pieces: usize,
    total_rows: usize,
    best_score: u64,
}

impl BenchRow {
    #[expect(clippy::cast_precision_loss)]
    fn mean(&self, total: f64) -> f64 {
        total / self.games.max(1) as f64
    }
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let BenchArg {
        ai,
        strategies,
        games,
        seed,
        max_pieces,
        piece_rule,
    } = arg;
    anyhow::ensure!(*games > 0, "--games must be positive");

    let base = ai.to_config()?;
    println!(
        "{:<10} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "strategy", "games", "losses", "mean score", "best score", "mean pcs", "mean rows"
    );
    for &strategy in strategies {
        let mut config = base.clone();
        config.strategy = strategy;

        let mut row = BenchRow::default();
        for i in 0..*games {
            let mut game = Game::new(&config, seed + i, *piece_rule, Pace::Direct, *max_pieces)?;
            game.play_to_end();
            let session = game.session();
            log::info!(
                "{strategy} seed {}: score {}, {} pieces",
                seed + i,
                session.score(),
                session.stats().completed_pieces()
            );
            row.games += 1;
            row.losses += u64::from(session.is_lost());
            row.total_score += session.score();
            row.total_pieces += session.stats().completed_pieces();
            row.total_rows += session.stats().total_cleared_rows();
            row.best_score = row.best_score.max(session.score());
        }

        #[expect(clippy::cast_precision_loss)]
        let (score, pieces, rows) = (
            row.mean(row.total_score as f64),
            row.mean(row.total_pieces as f64),
            row.mean(row.total_rows as f64),
        );
        println!(
            "{:<10} {:>6} {:>6} {:>10.1} {:>10} {:>10.1} {:>10.1}",
            strategy.to_string(),
            row.games,
            row.losses,
            score,
            row.best_score,
            pieces,
            rows
        );
    }
    Ok(())
}
