//! Computer players for the blockfall engine.
//!
//! The building blocks are independent of each other:
//!
//! - [`reachability`] lists every resting placement the active piece can reach
//! - [`PathPlan`] turns a chosen placement into a sequence of live commands
//! - [`heuristic`] scores board positions with configurable weights
//! - [`strategy`] holds the search algorithms built on top of those
//! - [`AutoPlayer`] drives a game session with a strategy, one command at a time
//!
//! # Example
//!
//! ```
//! use blockfall_ai::{AiConfig, AutoPlayer};
//! use blockfall_engine::GameSession;
//!
//! let mut session = GameSession::new(1);
//! let mut player = AutoPlayer::from_config(&AiConfig::default()).unwrap();
//!
//! for _ in 0..3 {
//!     player.place_directly(&mut session);
//! }
//! assert_eq!(session.stats().completed_pieces(), 3);
//! ```

pub use self::{auto_player::*, config::*, path::*};

mod auto_player;
mod config;
pub mod heuristic;
mod path;
pub mod reachability;
pub mod strategy;
