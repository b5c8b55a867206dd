use anyhow::Context as _;
use blockfall_ai::{AiConfig, AutoPlayer};
use blockfall_engine::{Board, GameSession, PieceRule};

/// Game time a paced piece may take before the game is declared stuck.
const PIECE_TIMEOUT_MS: u64 = 60_000;

/// How the AI's decisions reach the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pace {
    /// Commit every chosen placement immediately.
    Direct,
    /// Send paced commands while gravity runs, advancing this many milliseconds per tick.
    Ticks(u64),
}

/// One AI player on its own session.
#[derive(Debug)]
pub(crate) struct Game {
    session: GameSession,
    player: AutoPlayer,
    pace: Pace,
    max_pieces: usize,
    stalled: bool,
    piece_elapsed_ms: u64,
    last_generation: u64,
}

impl Game {
    pub(crate) fn new(
        config: &AiConfig,
        seed: u64,
        rule: PieceRule,
        pace: Pace,
        max_pieces: usize,
    ) -> anyhow::Result<Self> {
        let player = AutoPlayer::from_config(config).context("Failed to create AI player")?;
        let session = GameSession::with_board(Board::with_rule(seed, rule));
        Ok(Self {
            session,
            player,
            pace,
            max_pieces,
            stalled: false,
            piece_elapsed_ms: 0,
            last_generation: 0,
        })
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(crate) fn strategy_name(&self) -> &'static str {
        self.player.strategy_name()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.stalled
            || self.session.is_lost()
            || self.session.stats().completed_pieces() >= self.max_pieces
    }

    /// Advances by one placement (direct) or one tick (paced).
    pub(crate) fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        match self.pace {
            Pace::Direct => {
                if self.player.place_directly(&mut self.session).is_none() {
                    log::warn!("{} declined to place a piece", self.strategy_name());
                    self.stalled = true;
                }
            }
            Pace::Ticks(tick_ms) => {
                self.session.tick(tick_ms);
                self.player.update(&mut self.session, tick_ms);
                let generation = self.session.piece_generation();
                if generation == self.last_generation {
                    self.piece_elapsed_ms += tick_ms;
                } else {
                    self.last_generation = generation;
                    self.piece_elapsed_ms = 0;
                }
                if self.piece_elapsed_ms > PIECE_TIMEOUT_MS {
                    log::warn!("{} is stuck on piece {generation}", self.strategy_name());
                    self.stalled = true;
                }
            }
        }
    }

    pub(crate) fn play_to_end(&mut self) {
        while !self.is_finished() {
            self.advance();
        }
    }
}
