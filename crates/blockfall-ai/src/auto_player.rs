use blockfall_engine::{Command, GameSession, Placement};

use crate::{
    ConfigError,
    config::AiConfig,
    path::PathPlan,
    reachability,
    strategy::Strategy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum AutoPlayerState {
    /// Nothing to do until the next piece spawns.
    Idle,
    /// A placement has to be chosen for the active piece.
    Deciding,
    /// Commands are being sent to move the piece to its target.
    Executing,
}

/// Drives a [`GameSession`] with a [`Strategy`], one paced command at a time.
///
/// The player notices a new piece by its generation counter, asks the strategy
/// for a target, plans a path, and then sends one command per elapsed
/// command interval. The next command is always looked up from the live pose,
/// so gravity pulling the piece down does not derail the plan.
///
/// A target that turns out to have no path is remembered until the next piece
/// and left out of the following decisions.
#[derive(Debug)]
pub struct AutoPlayer {
    strategy: Box<dyn Strategy>,
    command_interval_ms: u64,
    state: AutoPlayerState,
    generation: Option<u64>,
    target: Option<Placement>,
    rejected: Vec<Placement>,
    plan: Option<PathPlan>,
    command_elapsed_ms: u64,
}

impl AutoPlayer {
    /// # Panics
    ///
    /// Panics if `command_interval_ms` is zero.
    #[must_use]
    pub fn new(strategy: Box<dyn Strategy>, command_interval_ms: u64) -> Self {
        assert!(command_interval_ms > 0, "command interval must be positive");
        Self {
            strategy,
            command_interval_ms,
            state: AutoPlayerState::Idle,
            generation: None,
            target: None,
            rejected: vec![],
            plan: None,
            command_elapsed_ms: 0,
        }
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, ConfigError> {
        let strategy = config.build_strategy()?;
        Ok(Self::new(strategy, config.command_interval_ms))
    }

    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    #[must_use]
    pub fn state(&self) -> AutoPlayerState {
        self.state
    }

    /// The placement the player is steering the active piece to.
    #[must_use]
    pub fn target(&self) -> Option<Placement> {
        self.target
    }

    /// Advances the player by `elapsed_ms` milliseconds of game time.
    pub fn update(&mut self, session: &mut GameSession, elapsed_ms: u64) {
        if session.is_lost() {
            self.state = AutoPlayerState::Idle;
            return;
        }

        let generation = session.piece_generation();
        if self.generation != Some(generation) {
            self.generation = Some(generation);
            self.target = None;
            self.rejected.clear();
            self.plan = None;
            self.command_elapsed_ms = 0;
            self.state = AutoPlayerState::Deciding;
        }

        if self.state.is_deciding() {
            self.decide(session);
        }
        if !self.state.is_executing() {
            return;
        }

        self.command_elapsed_ms += elapsed_ms;
        while self.command_elapsed_ms >= self.command_interval_ms {
            self.command_elapsed_ms -= self.command_interval_ms;
            if !self.step(session) {
                break;
            }
        }
    }

    /// Chooses a placement and commits it immediately, skipping the command stream.
    ///
    /// Returns the placement, or `None` if the strategy declined or the
    /// session is over.
    pub fn place_directly(&mut self, session: &mut GameSession) -> Option<Placement> {
        if session.is_lost() {
            return None;
        }
        let placement = self.strategy.decide(session.board())?;
        if !session.place(placement) {
            log::warn!("{} chose an invalid placement {placement:?}", self.strategy.name());
            return None;
        }
        Some(placement)
    }

    fn decide(&mut self, session: &mut GameSession) {
        let mut candidates = reachability::enumerate(session.board());
        candidates.retain(|placement| !self.rejected.contains(placement));
        let Some(target) = self.strategy.decide_among(session.board(), &candidates) else {
            log::debug!("{} found no placement", self.strategy.name());
            session.clear_overlay();
            self.state = AutoPlayerState::Idle;
            return;
        };
        log::debug!(
            "{} targets {target:?} for piece {}",
            self.strategy.name(),
            session.piece_generation()
        );
        self.target = Some(target);
        session.set_overlay(session.active_piece().kind(), target);
        self.replan(session);
    }

    /// Plans a route to the current target from the live pose.
    fn replan(&mut self, session: &GameSession) -> bool {
        let Some(target) = self.target else {
            self.state = AutoPlayerState::Deciding;
            return false;
        };
        match PathPlan::find(session.board(), target) {
            Ok(plan) => {
                self.plan = Some(plan);
                self.state = AutoPlayerState::Executing;
                true
            }
            Err(e) => {
                log::warn!("{e}; deciding again");
                self.rejected.push(target);
                self.target = None;
                self.plan = None;
                self.state = AutoPlayerState::Deciding;
                false
            }
        }
    }

    /// Sends one command. Returns whether more commands may follow in this update.
    fn step(&mut self, session: &mut GameSession) -> bool {
        let pose = session.active_piece().placement();
        let command = self.plan.as_ref().and_then(|plan| plan.next_command(pose));
        match command {
            Some(command) => {
                if !session.apply(command) {
                    log::warn!("{command} was blocked at {pose:?}; replanning");
                    return self.replan(session);
                }
                true
            }
            None if Some(pose) == self.target => {
                session.apply(Command::Lock);
                self.state = AutoPlayerState::Idle;
                false
            }
            None => {
                log::warn!("piece left the planned route at {pose:?}; replanning");
                self.replan(session)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::Board;

    use super::*;
    use crate::{
        heuristic::HeuristicWeights,
        strategy::{GreedyStrategy, RandomStrategy},
    };

    /// Takes a placement off the field on its first call, then the first candidate.
    #[derive(Debug, Default)]
    struct OffFieldFirst {
        calls: usize,
    }

    impl Strategy for OffFieldFirst {
        fn name(&self) -> &'static str {
            "off-field-first"
        }

        fn decide_among(&mut self, _board: &Board, candidates: &[Placement]) -> Option<Placement> {
            self.calls += 1;
            if self.calls == 1 {
                return Some(Placement::new(-20, 5, 0));
            }
            candidates.first().copied()
        }
    }

    /// Plays greedy placements until the chosen target has no path from spawn.
    fn board_with_unplannable_target(seed: u64) -> Option<Board> {
        let mut board = Board::new(seed);
        let mut strategy = GreedyStrategy::new(1, HeuristicWeights::AGGRO);
        for _ in 0..200 {
            let target = strategy.decide(&board)?;
            if PathPlan::find(&board, target).is_err() {
                return Some(board);
            }
            if board.push(target) {
                return None;
            }
        }
        None
    }

    fn greedy_player(interval: u64) -> AutoPlayer {
        AutoPlayer::new(
            Box::new(GreedyStrategy::new(1, HeuristicWeights::CLASSIC)),
            interval,
        )
    }

    #[test]
    fn test_places_piece_at_target() {
        let mut session = GameSession::new(5).with_fall_interval(0);
        let mut player = greedy_player(10);
        player.update(&mut session, 0);
        assert!(player.state().is_executing());
        let target = player.target().unwrap();
        let kind = session.active_piece().kind();
        assert_eq!(session.overlay().len(), 4);

        for _ in 0..200 {
            if session.piece_generation() > 0 {
                break;
            }
            player.update(&mut session, 10);
        }
        assert_eq!(session.piece_generation(), 1);
        let expected: Vec<_> = blockfall_engine::Piece::new(kind, target)
            .occupied_cells()
            .collect();
        for (x, y) in expected {
            assert_eq!(session.board().grid().block_at(x, y), Some(kind));
        }
    }

    #[test]
    fn test_one_command_per_interval() {
        let mut session = GameSession::new(5).with_fall_interval(0);
        let mut player = greedy_player(100);
        player.update(&mut session, 0);
        let start = session.active_piece();
        player.update(&mut session, 99);
        assert_eq!(session.active_piece(), start);
        player.update(&mut session, 1);
        assert_ne!(session.active_piece(), start);
    }

    #[test]
    fn test_survives_with_gravity() {
        let mut session = GameSession::new(11);
        let mut player = greedy_player(20);
        for _ in 0..3000 {
            session.tick(10);
            player.update(&mut session, 10);
        }
        assert!(session.stats().completed_pieces() > 5);
    }

    #[test]
    fn test_new_piece_triggers_decision() {
        let mut session = GameSession::new(3).with_fall_interval(0);
        let mut player = AutoPlayer::new(Box::new(RandomStrategy::new(1)), 1);
        player.update(&mut session, 0);
        let first = player.target();
        assert!(first.is_some());
        player.place_directly(&mut session);
        player.update(&mut session, 0);
        assert!(player.state().is_executing());
        assert_eq!(session.piece_generation(), 1);
    }

    #[test]
    fn test_idle_after_game_over() {
        let board = Board::new(1);
        let mut session = GameSession::with_board(board).with_fall_interval(0);
        session.apply(Command::Lock);
        assert!(session.is_lost());
        let mut player = greedy_player(10);
        player.update(&mut session, 100);
        assert!(player.state().is_idle());
        assert_eq!(player.place_directly(&mut session), None);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = AiConfig {
            command_interval_ms: 0,
            ..AiConfig::default()
        };
        assert!(AutoPlayer::from_config(&config).is_err());
        assert_eq!(
            AutoPlayer::from_config(&AiConfig::default())
                .unwrap()
                .strategy_name(),
            "greedy"
        );
    }

    #[test]
    fn test_unplannable_target_is_decided_again() {
        let mut session = GameSession::new(2).with_fall_interval(0);
        let mut player = AutoPlayer::new(Box::<OffFieldFirst>::default(), 10);
        player.update(&mut session, 0);
        assert!(player.state().is_deciding());
        assert_eq!(player.target(), None);
        assert_eq!(player.rejected, [Placement::new(-20, 5, 0)]);

        player.update(&mut session, 0);
        assert!(player.state().is_executing());
        for _ in 0..200 {
            if session.piece_generation() > 0 {
                break;
            }
            player.update(&mut session, 10);
        }
        assert_eq!(session.piece_generation(), 1);
    }

    #[test]
    fn test_rejected_targets_are_excluded() {
        let board = board_with_unplannable_target(33).unwrap();
        let generation = board.piece_generation();
        let mut session = GameSession::with_board(board).with_fall_interval(0);
        let mut player = AutoPlayer::new(
            Box::new(GreedyStrategy::new(1, HeuristicWeights::AGGRO)),
            10,
        );
        player.update(&mut session, 0);
        assert_eq!(player.rejected.len(), 1);

        for _ in 0..500 {
            if session.piece_generation() != generation {
                break;
            }
            player.update(&mut session, 10);
        }
        assert_eq!(session.piece_generation(), generation + 1);
        assert!(!player.rejected.is_empty());
    }
}
